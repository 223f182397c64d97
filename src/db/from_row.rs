//! Row mapping trait and helpers for reducing boilerplate in queries.
//!
//! Models implement `FromRow` to define how they are constructed from a
//! database row; `query_one` and the paging helper then replace the
//! repetitive row mapping closures. SQL column lists live next to the impls
//! so a schema change only has to touch one file.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to
/// rusqlite errors instead of panicking on corrupt data.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Parse an optional `YYYY-MM-DD` text column into a date.
fn parse_date(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(col)? {
        None => Ok(None),
        Some(s) => s.parse::<NaiveDate>().map(Some).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                col,
                col_name.to_string(),
                rusqlite::types::Type::Text,
            )
        }),
    }
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

// ============ SQL SELECT Constants ============

pub const USER_COLS: &str =
    "id, email, name, role, api_key_prefix, api_key_hash, is_active, created_at, updated_at";

pub const SERVICE_COLS: &str = "id, name, slug, short_description, description, tagline, category, icon, hero_image_url, is_active, display_order, created_at, updated_at";

pub const PROJECT_COLS: &str = "id, service_id, name, slug, short_description, description, location, client_name, status, is_featured, cover_image_url, start_date, end_date, created_at, updated_at";

pub const MEDIA_COLS: &str = "id, project_id, title, description, url, media_type, is_featured, sort_order, created_at, updated_at";

pub const TESTIMONIAL_COLS: &str = "id, client_name, client_role, company, message, rating, is_featured, is_active, display_order, created_at, updated_at";

pub const INQUIRY_COLS: &str = "id, full_name, email, phone, project_type, budget_range, location, message, status, source, service_id, project_id, created_at, updated_at";

pub const SUBSCRIBER_COLS: &str = "id, email, created_at";

pub const CAMPAIGN_COLS: &str = "id, name, slug, short_description, description, currency, target_amount, raised_amount, status, is_featured, sort_order, hero_image_url, start_date, end_date, created_at, updated_at";

pub const DONATION_COLS: &str = "id, amount, currency, status, donor_name, donor_email, donor_phone, is_anonymous, message, campaign_id, payment_method, payment_provider, provider_session_id, provider_payment_id, provider_customer_id, provider_status, card_brand, card_last4, card_exp_month, card_exp_year, ip_address, user_agent, created_at, updated_at";

// ============ FromRow Implementations ============

impl FromRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: parse_enum(row, 3, "role")?,
            api_key_prefix: row.get(4)?,
            api_key_hash: row.get(5)?,
            is_active: row.get::<_, i32>(6)? != 0,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl FromRow for Service {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Service {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            short_description: row.get(3)?,
            description: row.get(4)?,
            tagline: row.get(5)?,
            category: row.get(6)?,
            icon: row.get(7)?,
            hero_image_url: row.get(8)?,
            is_active: row.get::<_, i32>(9)? != 0,
            display_order: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

impl FromRow for Project {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get(0)?,
            service_id: row.get(1)?,
            name: row.get(2)?,
            slug: row.get(3)?,
            short_description: row.get(4)?,
            description: row.get(5)?,
            location: row.get(6)?,
            client_name: row.get(7)?,
            status: parse_enum(row, 8, "status")?,
            is_featured: row.get::<_, i32>(9)? != 0,
            cover_image_url: row.get(10)?,
            start_date: parse_date(row, 11, "start_date")?,
            end_date: parse_date(row, 12, "end_date")?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }
}

impl FromRow for Media {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Media {
            id: row.get(0)?,
            project_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            url: row.get(4)?,
            media_type: parse_enum(row, 5, "media_type")?,
            is_featured: row.get::<_, i32>(6)? != 0,
            sort_order: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl FromRow for Testimonial {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Testimonial {
            id: row.get(0)?,
            client_name: row.get(1)?,
            client_role: row.get(2)?,
            company: row.get(3)?,
            message: row.get(4)?,
            rating: row.get(5)?,
            is_featured: row.get::<_, i32>(6)? != 0,
            is_active: row.get::<_, i32>(7)? != 0,
            display_order: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl FromRow for Inquiry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Inquiry {
            id: row.get(0)?,
            full_name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            project_type: row.get(4)?,
            budget_range: row.get(5)?,
            location: row.get(6)?,
            message: row.get(7)?,
            status: parse_enum(row, 8, "status")?,
            source: row.get(9)?,
            service_id: row.get(10)?,
            project_id: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }
}

impl FromRow for Subscriber {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Subscriber {
            id: row.get(0)?,
            email: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl FromRow for Campaign {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Campaign {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            short_description: row.get(3)?,
            description: row.get(4)?,
            currency: row.get(5)?,
            target_amount: row.get(6)?,
            raised_amount: row.get(7)?,
            status: parse_enum(row, 8, "status")?,
            is_featured: row.get::<_, i32>(9)? != 0,
            sort_order: row.get(10)?,
            hero_image_url: row.get(11)?,
            start_date: parse_date(row, 12, "start_date")?,
            end_date: parse_date(row, 13, "end_date")?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }
}

impl FromRow for Donation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Donation {
            id: row.get(0)?,
            amount: row.get(1)?,
            currency: row.get(2)?,
            status: parse_enum(row, 3, "status")?,
            donor_name: row.get(4)?,
            donor_email: row.get(5)?,
            donor_phone: row.get(6)?,
            is_anonymous: row.get::<_, i32>(7)? != 0,
            message: row.get(8)?,
            campaign_id: row.get(9)?,
            payment_method: parse_enum(row, 10, "payment_method")?,
            payment_provider: row.get(11)?,
            provider_session_id: row.get(12)?,
            provider_payment_id: row.get(13)?,
            provider_customer_id: row.get(14)?,
            provider_status: row.get(15)?,
            card_brand: row.get(16)?,
            card_last4: row.get(17)?,
            card_exp_month: row.get(18)?,
            card_exp_year: row.get(19)?,
            ip_address: row.get(20)?,
            user_agent: row.get(21)?,
            created_at: row.get(22)?,
            updated_at: row.get(23)?,
        })
    }
}
