use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Back-office accounts (bearer API key auth, key stored hashed)
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('admin', 'staff')),
            api_key_prefix TEXT NOT NULL,
            api_key_hash TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        CREATE INDEX IF NOT EXISTS idx_users_key_hash ON users(api_key_hash);

        -- Service offerings (public site content)
        CREATE TABLE IF NOT EXISTS services (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL,
            short_description TEXT,
            description TEXT,
            tagline TEXT,
            category TEXT,
            icon TEXT,
            hero_image_url TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_services_slug ON services(slug);

        -- Portfolio projects
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            service_id TEXT REFERENCES services(id) ON DELETE SET NULL,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            short_description TEXT,
            description TEXT,
            location TEXT,
            client_name TEXT,
            status TEXT NOT NULL CHECK (status IN ('planned', 'ongoing', 'completed', 'on_hold')),
            is_featured INTEGER NOT NULL DEFAULT 0,
            cover_image_url TEXT,
            start_date TEXT,
            end_date TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_projects_slug ON projects(slug);
        CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status);
        CREATE INDEX IF NOT EXISTS idx_projects_service ON projects(service_id);

        -- Gallery media, optionally attached to a project
        CREATE TABLE IF NOT EXISTS media (
            id TEXT PRIMARY KEY,
            project_id TEXT REFERENCES projects(id) ON DELETE CASCADE,
            title TEXT,
            description TEXT,
            url TEXT NOT NULL,
            media_type TEXT NOT NULL CHECK (media_type IN ('image', 'video')),
            is_featured INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_media_project ON media(project_id);
        CREATE INDEX IF NOT EXISTS idx_media_featured ON media(is_featured);

        -- Client testimonials
        CREATE TABLE IF NOT EXISTS testimonials (
            id TEXT PRIMARY KEY,
            client_name TEXT NOT NULL,
            client_role TEXT,
            company TEXT,
            message TEXT NOT NULL,
            rating INTEGER,
            is_featured INTEGER NOT NULL DEFAULT 1,
            is_active INTEGER NOT NULL DEFAULT 1,
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_testimonials_active ON testimonials(is_active);

        -- Sales leads from the public contact form
        CREATE TABLE IF NOT EXISTS inquiries (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            project_type TEXT,
            budget_range TEXT,
            location TEXT,
            message TEXT,
            status TEXT NOT NULL CHECK (status IN ('new', 'in_review', 'quoted', 'closed')),
            source TEXT,
            service_id TEXT REFERENCES services(id) ON DELETE SET NULL,
            project_id TEXT REFERENCES projects(id) ON DELETE SET NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_inquiries_status ON inquiries(status);
        CREATE INDEX IF NOT EXISTS idx_inquiries_created ON inquiries(created_at);

        -- Newsletter subscribers
        CREATE TABLE IF NOT EXISTS subscribers (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL
        );

        -- Fundraising campaigns. Amounts in integer major currency units.
        CREATE TABLE IF NOT EXISTS campaigns (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            short_description TEXT,
            description TEXT,
            currency TEXT NOT NULL DEFAULT 'UGX',
            target_amount INTEGER,
            raised_amount INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL CHECK (status IN ('draft', 'active', 'closed', 'archived')),
            is_featured INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            hero_image_url TEXT,
            start_date TEXT,
            end_date TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_campaigns_slug ON campaigns(slug);
        CREATE INDEX IF NOT EXISTS idx_campaigns_status ON campaigns(status);

        -- Donations. provider_session_id correlates webhook events back to a
        -- row and must be unambiguous, hence the UNIQUE index. Card fields
        -- are fingerprint-only; a full PAN is never stored.
        CREATE TABLE IF NOT EXISTS donations (
            id TEXT PRIMARY KEY,
            amount INTEGER NOT NULL,
            currency TEXT NOT NULL DEFAULT 'UGX',
            status TEXT NOT NULL CHECK (status IN ('pending', 'confirmed', 'failed', 'refunded')),
            donor_name TEXT,
            donor_email TEXT,
            donor_phone TEXT,
            is_anonymous INTEGER NOT NULL DEFAULT 0,
            message TEXT,
            campaign_id TEXT REFERENCES campaigns(id) ON DELETE SET NULL,
            payment_method TEXT NOT NULL CHECK (payment_method IN ('card', 'mtn_momo', 'airtel_momo')),
            payment_provider TEXT,
            provider_session_id TEXT,
            provider_payment_id TEXT,
            provider_customer_id TEXT,
            provider_status TEXT,
            card_brand TEXT,
            card_last4 TEXT,
            card_exp_month INTEGER,
            card_exp_year INTEGER,
            ip_address TEXT,
            user_agent TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_donations_session ON donations(provider_session_id)
            WHERE provider_session_id IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_donations_campaign ON donations(campaign_id);
        CREATE INDEX IF NOT EXISTS idx_donations_status ON donations(status);
        CREATE INDEX IF NOT EXISTS idx_donations_created ON donations(created_at DESC);
        "#,
    )?;
    Ok(())
}
