use chrono::Utc;
use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension};
use uuid::Uuid;

use crate::auth::{hash_secret, key_prefix};
use crate::error::Result;
use crate::models::*;

use super::from_row::{
    query_one, FromRow, CAMPAIGN_COLS, DONATION_COLS, INQUIRY_COLS, MEDIA_COLS, PROJECT_COLS,
    SERVICE_COLS, SUBSCRIBER_COLS, TESTIMONIAL_COLS, USER_COLS,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builder for dynamic UPDATE statements with optional fields.
/// Combines multiple field updates into a single query.
struct UpdateBuilder {
    table: &'static str,
    id: String,
    fields: Vec<(&'static str, Value)>,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: &str) -> Self {
        Self {
            table,
            id: id.to_string(),
            fields: Vec::new(),
        }
    }

    fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Execute the update and return the updated entity via RETURNING.
    /// Returns None if no row matched or there was nothing to update.
    fn execute_returning<T: FromRow>(
        mut self,
        conn: &Connection,
        returning_cols: &str,
    ) -> Result<Option<T>> {
        if self.fields.is_empty() {
            // Nothing to change; hand back the current row so PUT with an
            // empty body behaves like a read.
            let sql = format!(
                "SELECT {} FROM {} WHERE id = ?1",
                returning_cols, self.table
            );
            return query_one(conn, &sql, &[&self.id]);
        }
        self.fields.push(("updated_at", now().into()));
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            self.table,
            sets.join(", "),
            returning_cols
        );
        conn.query_row(&sql, params_from_iter(values), T::from_row)
            .optional()
            .map_err(Into::into)
    }
}

/// Shared COUNT + page pattern for filtered list queries.
fn list_page<T: FromRow>(
    conn: &Connection,
    table: &str,
    cols: &str,
    where_sql: &str,
    order_sql: &str,
    filter_params: Vec<Value>,
    limit: i64,
    skip: i64,
) -> Result<(Vec<T>, i64)> {
    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {} {}", table, where_sql),
        params_from_iter(filter_params.clone()),
        |row| row.get(0),
    )?;

    let mut page_params = filter_params;
    page_params.push(limit.into());
    page_params.push(skip.into());

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {} {} {} LIMIT ? OFFSET ?",
        cols, table, where_sql, order_sql
    ))?;
    let items = stmt
        .query_map(params_from_iter(page_params), T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((items, total))
}

// ============ Users ============

/// Create a back-office account. The caller supplies the freshly generated
/// API key; only its hash and display prefix are stored.
pub fn create_user(conn: &Connection, input: &CreateUser, api_key: &str) -> Result<User> {
    let id = gen_id();
    let now = now();
    let email = input.email.trim().to_lowercase();
    let prefix = key_prefix(api_key);
    let hash = hash_secret(api_key);

    conn.execute(
        "INSERT INTO users (id, email, name, role, api_key_prefix, api_key_hash, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8)",
        params![&id, &email, &input.name, input.role.as_str(), &prefix, &hash, now, now],
    )?;

    Ok(User {
        id,
        email,
        name: input.name.clone(),
        role: input.role,
        api_key_prefix: prefix,
        api_key_hash: hash,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let email = email.trim().to_lowercase();
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&email],
    )
}

/// Look up an active account by its bearer API key.
pub fn get_user_by_api_key(conn: &Connection, api_key: &str) -> Result<Option<User>> {
    let hash = hash_secret(api_key);
    query_one(
        conn,
        &format!(
            "SELECT {} FROM users WHERE api_key_hash = ?1 AND is_active = 1",
            USER_COLS
        ),
        &[&hash],
    )
}

pub fn list_users(
    conn: &Connection,
    role: Option<UserRole>,
    limit: i64,
    skip: i64,
) -> Result<(Vec<User>, i64)> {
    let (where_sql, filter_params) = match role {
        Some(r) => ("WHERE role = ?", vec![Value::from(r.as_str().to_string())]),
        None => ("", vec![]),
    };
    list_page(
        conn,
        "users",
        USER_COLS,
        where_sql,
        "ORDER BY email ASC",
        filter_params,
        limit,
        skip,
    )
}

/// Promote/demote an account or toggle its access.
pub fn update_user_role(
    conn: &Connection,
    id: &str,
    input: &UpdateUserRole,
) -> Result<Option<User>> {
    UpdateBuilder::new("users", id)
        .set_opt("role", input.role.map(|r| r.as_str().to_string()))
        .set_opt("is_active", input.is_active.map(|b| b as i64))
        .execute_returning(conn, USER_COLS)
}

pub fn count_users(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(Into::into)
}

// ============ Services ============

pub fn create_service(conn: &Connection, input: &CreateService) -> Result<Service> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO services (id, name, slug, short_description, description, tagline, category, icon, hero_image_url, is_active, display_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            &id,
            &input.name,
            &input.slug,
            &input.short_description,
            &input.description,
            &input.tagline,
            &input.category,
            &input.icon,
            &input.hero_image_url,
            input.is_active as i64,
            input.display_order,
            now,
            now
        ],
    )?;

    get_service_by_id(conn, &id)?
        .ok_or_else(|| crate::error::AppError::Internal("service row missing after insert".into()))
}

pub fn get_service_by_id(conn: &Connection, id: &str) -> Result<Option<Service>> {
    query_one(
        conn,
        &format!("SELECT {} FROM services WHERE id = ?1", SERVICE_COLS),
        &[&id],
    )
}

pub fn get_service_by_slug(conn: &Connection, slug: &str) -> Result<Option<Service>> {
    query_one(
        conn,
        &format!("SELECT {} FROM services WHERE slug = ?1", SERVICE_COLS),
        &[&slug],
    )
}

pub fn list_services(
    conn: &Connection,
    include_inactive: bool,
    limit: i64,
    skip: i64,
) -> Result<(Vec<Service>, i64)> {
    let where_sql = if include_inactive {
        ""
    } else {
        "WHERE is_active = 1"
    };
    list_page(
        conn,
        "services",
        SERVICE_COLS,
        where_sql,
        "ORDER BY display_order ASC, created_at DESC",
        vec![],
        limit,
        skip,
    )
}

pub fn update_service(
    conn: &Connection,
    id: &str,
    input: &UpdateService,
) -> Result<Option<Service>> {
    UpdateBuilder::new("services", id)
        .set_opt("name", input.name.clone())
        .set_opt("slug", input.slug.clone())
        .set_opt("short_description", input.short_description.clone())
        .set_opt("description", input.description.clone())
        .set_opt("tagline", input.tagline.clone())
        .set_opt("category", input.category.clone())
        .set_opt("icon", input.icon.clone())
        .set_opt("hero_image_url", input.hero_image_url.clone())
        .set_opt("is_active", input.is_active.map(|b| b as i64))
        .set_opt("display_order", input.display_order)
        .execute_returning(conn, SERVICE_COLS)
}

pub fn delete_service(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ============ Projects ============

pub fn create_project(conn: &Connection, input: &CreateProject) -> Result<Project> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO projects (id, service_id, name, slug, short_description, description, location, client_name, status, is_featured, cover_image_url, start_date, end_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            &id,
            &input.service_id,
            &input.name,
            &input.slug,
            &input.short_description,
            &input.description,
            &input.location,
            &input.client_name,
            input.status.as_str(),
            input.is_featured as i64,
            &input.cover_image_url,
            input.start_date.map(|d| d.to_string()),
            input.end_date.map(|d| d.to_string()),
            now,
            now
        ],
    )?;

    get_project_by_id(conn, &id)?
        .ok_or_else(|| crate::error::AppError::Internal("project row missing after insert".into()))
}

pub fn get_project_by_id(conn: &Connection, id: &str) -> Result<Option<Project>> {
    query_one(
        conn,
        &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLS),
        &[&id],
    )
}

pub fn get_project_by_slug(conn: &Connection, slug: &str) -> Result<Option<Project>> {
    query_one(
        conn,
        &format!("SELECT {} FROM projects WHERE slug = ?1", PROJECT_COLS),
        &[&slug],
    )
}

pub fn list_projects(
    conn: &Connection,
    filters: &ProjectFilters,
    limit: i64,
    skip: i64,
) -> Result<(Vec<Project>, i64)> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(status) = filters.status {
        clauses.push("status = ?");
        params.push(status.as_str().to_string().into());
    }
    if let Some(ref service_id) = filters.service_id {
        clauses.push("service_id = ?");
        params.push(service_id.clone().into());
    }
    if let Some(featured) = filters.is_featured {
        clauses.push("is_featured = ?");
        params.push((featured as i64).into());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    list_page(
        conn,
        "projects",
        PROJECT_COLS,
        &where_sql,
        "ORDER BY created_at DESC",
        params,
        limit,
        skip,
    )
}

pub fn update_project(
    conn: &Connection,
    id: &str,
    input: &UpdateProject,
) -> Result<Option<Project>> {
    UpdateBuilder::new("projects", id)
        .set_opt("service_id", input.service_id.clone())
        .set_opt("name", input.name.clone())
        .set_opt("slug", input.slug.clone())
        .set_opt("short_description", input.short_description.clone())
        .set_opt("description", input.description.clone())
        .set_opt("location", input.location.clone())
        .set_opt("client_name", input.client_name.clone())
        .set_opt("status", input.status.map(|s| s.as_str().to_string()))
        .set_opt("is_featured", input.is_featured.map(|b| b as i64))
        .set_opt("cover_image_url", input.cover_image_url.clone())
        .set_opt("start_date", input.start_date.map(|d| d.to_string()))
        .set_opt("end_date", input.end_date.map(|d| d.to_string()))
        .execute_returning(conn, PROJECT_COLS)
}

pub fn delete_project(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ============ Media ============

pub fn create_media(conn: &Connection, input: &CreateMedia) -> Result<Media> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO media (id, project_id, title, description, url, media_type, is_featured, sort_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            &id,
            &input.project_id,
            &input.title,
            &input.description,
            &input.url,
            input.media_type.as_str(),
            input.is_featured as i64,
            input.sort_order,
            now,
            now
        ],
    )?;

    get_media_by_id(conn, &id)?
        .ok_or_else(|| crate::error::AppError::Internal("media row missing after insert".into()))
}

pub fn get_media_by_id(conn: &Connection, id: &str) -> Result<Option<Media>> {
    query_one(
        conn,
        &format!("SELECT {} FROM media WHERE id = ?1", MEDIA_COLS),
        &[&id],
    )
}

pub fn list_media(
    conn: &Connection,
    filters: &MediaFilters,
    limit: i64,
    skip: i64,
) -> Result<(Vec<Media>, i64)> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(ref project_id) = filters.project_id {
        clauses.push("project_id = ?");
        params.push(project_id.clone().into());
    }
    if let Some(featured) = filters.is_featured {
        clauses.push("is_featured = ?");
        params.push((featured as i64).into());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    list_page(
        conn,
        "media",
        MEDIA_COLS,
        &where_sql,
        "ORDER BY sort_order ASC, created_at DESC",
        params,
        limit,
        skip,
    )
}

pub fn update_media(conn: &Connection, id: &str, input: &UpdateMedia) -> Result<Option<Media>> {
    UpdateBuilder::new("media", id)
        .set_opt("project_id", input.project_id.clone())
        .set_opt("title", input.title.clone())
        .set_opt("description", input.description.clone())
        .set_opt("url", input.url.clone())
        .set_opt("media_type", input.media_type.map(|t| t.as_str().to_string()))
        .set_opt("is_featured", input.is_featured.map(|b| b as i64))
        .set_opt("sort_order", input.sort_order)
        .execute_returning(conn, MEDIA_COLS)
}

pub fn delete_media(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM media WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ============ Testimonials ============

pub fn create_testimonial(conn: &Connection, input: &CreateTestimonial) -> Result<Testimonial> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO testimonials (id, client_name, client_role, company, message, rating, is_featured, is_active, display_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            &id,
            &input.client_name,
            &input.client_role,
            &input.company,
            &input.message,
            input.rating,
            input.is_featured as i64,
            input.is_active as i64,
            input.display_order,
            now,
            now
        ],
    )?;

    get_testimonial_by_id(conn, &id)?
        .ok_or_else(|| crate::error::AppError::Internal("testimonial row missing after insert".into()))
}

pub fn get_testimonial_by_id(conn: &Connection, id: &str) -> Result<Option<Testimonial>> {
    query_one(
        conn,
        &format!("SELECT {} FROM testimonials WHERE id = ?1", TESTIMONIAL_COLS),
        &[&id],
    )
}

/// Public listing only shows active rows; the admin listing includes all.
pub fn list_testimonials(
    conn: &Connection,
    include_inactive: bool,
    featured: Option<bool>,
    limit: i64,
    skip: i64,
) -> Result<(Vec<Testimonial>, i64)> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if !include_inactive {
        clauses.push("is_active = 1");
    }
    if let Some(featured) = featured {
        clauses.push("is_featured = ?");
        params.push((featured as i64).into());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    list_page(
        conn,
        "testimonials",
        TESTIMONIAL_COLS,
        &where_sql,
        "ORDER BY display_order ASC, created_at DESC",
        params,
        limit,
        skip,
    )
}

pub fn update_testimonial(
    conn: &Connection,
    id: &str,
    input: &UpdateTestimonial,
) -> Result<Option<Testimonial>> {
    UpdateBuilder::new("testimonials", id)
        .set_opt("client_name", input.client_name.clone())
        .set_opt("client_role", input.client_role.clone())
        .set_opt("company", input.company.clone())
        .set_opt("message", input.message.clone())
        .set_opt("rating", input.rating)
        .set_opt("is_featured", input.is_featured.map(|b| b as i64))
        .set_opt("is_active", input.is_active.map(|b| b as i64))
        .set_opt("display_order", input.display_order)
        .execute_returning(conn, TESTIMONIAL_COLS)
}

pub fn delete_testimonial(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM testimonials WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ============ Inquiries ============

pub fn create_inquiry(conn: &Connection, input: &CreateInquiry) -> Result<Inquiry> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO inquiries (id, full_name, email, phone, project_type, budget_range, location, message, status, source, service_id, project_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            &id,
            &input.full_name,
            &input.email,
            &input.phone,
            &input.project_type,
            &input.budget_range,
            &input.location,
            &input.message,
            InquiryStatus::New.as_str(),
            &input.source,
            &input.service_id,
            &input.project_id,
            now,
            now
        ],
    )?;

    get_inquiry_by_id(conn, &id)?
        .ok_or_else(|| crate::error::AppError::Internal("inquiry row missing after insert".into()))
}

pub fn get_inquiry_by_id(conn: &Connection, id: &str) -> Result<Option<Inquiry>> {
    query_one(
        conn,
        &format!("SELECT {} FROM inquiries WHERE id = ?1", INQUIRY_COLS),
        &[&id],
    )
}

pub fn list_inquiries(
    conn: &Connection,
    status: Option<InquiryStatus>,
    limit: i64,
    skip: i64,
) -> Result<(Vec<Inquiry>, i64)> {
    let (where_sql, filter_params) = match status {
        Some(s) => (
            "WHERE status = ?",
            vec![Value::from(s.as_str().to_string())],
        ),
        None => ("", vec![]),
    };
    list_page(
        conn,
        "inquiries",
        INQUIRY_COLS,
        where_sql,
        "ORDER BY created_at DESC",
        filter_params,
        limit,
        skip,
    )
}

pub fn update_inquiry_status(
    conn: &Connection,
    id: &str,
    status: InquiryStatus,
) -> Result<Option<Inquiry>> {
    UpdateBuilder::new("inquiries", id)
        .set("status", status.as_str().to_string())
        .execute_returning(conn, INQUIRY_COLS)
}

pub fn delete_inquiry(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM inquiries WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ============ Subscribers ============

pub fn get_subscriber_by_email(conn: &Connection, email: &str) -> Result<Option<Subscriber>> {
    let email = email.trim().to_lowercase();
    query_one(
        conn,
        &format!("SELECT {} FROM subscribers WHERE email = ?1", SUBSCRIBER_COLS),
        &[&email],
    )
}

pub fn create_subscriber(conn: &Connection, input: &CreateSubscriber) -> Result<Subscriber> {
    let id = gen_id();
    let now = now();
    let email = input.email.trim().to_lowercase();

    conn.execute(
        "INSERT INTO subscribers (id, email, created_at) VALUES (?1, ?2, ?3)",
        params![&id, &email, now],
    )?;

    Ok(Subscriber {
        id,
        email,
        created_at: now,
    })
}

pub fn list_subscribers(conn: &Connection, limit: i64, skip: i64) -> Result<(Vec<Subscriber>, i64)> {
    list_page(
        conn,
        "subscribers",
        SUBSCRIBER_COLS,
        "",
        "ORDER BY created_at DESC",
        vec![],
        limit,
        skip,
    )
}

pub fn delete_subscriber(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM subscribers WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ============ Campaigns ============

pub fn create_campaign(conn: &Connection, input: &CreateCampaign) -> Result<Campaign> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO campaigns (id, name, slug, short_description, description, currency, target_amount, raised_amount, status, is_featured, sort_order, hero_image_url, start_date, end_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            &id,
            &input.name,
            &input.slug,
            &input.short_description,
            &input.description,
            &input.currency,
            input.target_amount,
            input.status.as_str(),
            input.is_featured as i64,
            input.sort_order,
            &input.hero_image_url,
            input.start_date.map(|d| d.to_string()),
            input.end_date.map(|d| d.to_string()),
            now,
            now
        ],
    )?;

    get_campaign_by_id(conn, &id)?
        .ok_or_else(|| crate::error::AppError::Internal("campaign row missing after insert".into()))
}

pub fn get_campaign_by_id(conn: &Connection, id: &str) -> Result<Option<Campaign>> {
    query_one(
        conn,
        &format!("SELECT {} FROM campaigns WHERE id = ?1", CAMPAIGN_COLS),
        &[&id],
    )
}

pub fn get_campaign_by_slug(conn: &Connection, slug: &str) -> Result<Option<Campaign>> {
    query_one(
        conn,
        &format!("SELECT {} FROM campaigns WHERE slug = ?1", CAMPAIGN_COLS),
        &[&slug],
    )
}

pub fn list_campaigns(
    conn: &Connection,
    filters: &CampaignFilters,
    limit: i64,
    skip: i64,
) -> Result<(Vec<Campaign>, i64)> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(status) = filters.status {
        clauses.push("status = ?");
        params.push(status.as_str().to_string().into());
    }
    if let Some(featured) = filters.is_featured {
        clauses.push("is_featured = ?");
        params.push((featured as i64).into());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    list_page(
        conn,
        "campaigns",
        CAMPAIGN_COLS,
        &where_sql,
        "ORDER BY sort_order ASC, created_at DESC",
        params,
        limit,
        skip,
    )
}

pub fn update_campaign(
    conn: &Connection,
    id: &str,
    input: &UpdateCampaign,
) -> Result<Option<Campaign>> {
    UpdateBuilder::new("campaigns", id)
        .set_opt("name", input.name.clone())
        .set_opt("slug", input.slug.clone())
        .set_opt("short_description", input.short_description.clone())
        .set_opt("description", input.description.clone())
        .set_opt("currency", input.currency.clone())
        .set_opt("target_amount", input.target_amount)
        .set_opt("status", input.status.map(|s| s.as_str().to_string()))
        .set_opt("is_featured", input.is_featured.map(|b| b as i64))
        .set_opt("sort_order", input.sort_order)
        .set_opt("hero_image_url", input.hero_image_url.clone())
        .set_opt("start_date", input.start_date.map(|d| d.to_string()))
        .set_opt("end_date", input.end_date.map(|d| d.to_string()))
        .execute_returning(conn, CAMPAIGN_COLS)
}

/// Campaigns are never physically deleted through the API; archiving keeps
/// historical donations attached.
pub fn archive_campaign(conn: &Connection, id: &str) -> Result<Option<Campaign>> {
    UpdateBuilder::new("campaigns", id)
        .set("status", CampaignStatus::Archived.as_str().to_string())
        .execute_returning(conn, CAMPAIGN_COLS)
}

// ============ Donations ============

/// Create a donation in `pending` state. Provider fields are filled in by the
/// payment session service immediately afterwards.
pub fn create_donation(
    conn: &Connection,
    input: &CreateDonation,
    payment_method: PaymentMethod,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> Result<Donation> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO donations (id, amount, currency, status, donor_name, donor_email, donor_phone, is_anonymous, message, campaign_id, payment_method, ip_address, user_agent, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            &id,
            input.amount,
            &input.currency,
            DonationStatus::Pending.as_str(),
            &input.donor_name,
            &input.donor_email,
            &input.donor_phone,
            input.is_anonymous as i64,
            &input.message,
            &input.campaign_id,
            payment_method.as_str(),
            ip_address,
            user_agent,
            now,
            now
        ],
    )?;

    get_donation_by_id(conn, &id)?
        .ok_or_else(|| crate::error::AppError::Internal("donation row missing after insert".into()))
}

pub fn get_donation_by_id(conn: &Connection, id: &str) -> Result<Option<Donation>> {
    query_one(
        conn,
        &format!("SELECT {} FROM donations WHERE id = ?1", DONATION_COLS),
        &[&id],
    )
}

pub fn get_donation_by_session_id(
    conn: &Connection,
    session_id: &str,
) -> Result<Option<Donation>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM donations WHERE provider_session_id = ?1",
            DONATION_COLS
        ),
        &[&session_id],
    )
}

/// Record the provider checkout reference on a donation. Must happen before
/// the intent response is returned so the webhook can always correlate.
pub fn attach_payment_session(
    conn: &Connection,
    donation_id: &str,
    provider: &str,
    session_id: &str,
    payment_method: PaymentMethod,
) -> Result<()> {
    conn.execute(
        "UPDATE donations
         SET payment_provider = ?2, provider_session_id = ?3, provider_payment_id = ?3,
             provider_status = 'created', payment_method = ?4, updated_at = ?5
         WHERE id = ?1",
        params![donation_id, provider, session_id, payment_method.as_str(), now()],
    )?;
    Ok(())
}

/// Record the raw provider status string without touching the mapped status.
/// Used when a delivery degrades to a no-op against a settled donation.
pub fn set_donation_provider_status(
    conn: &Connection,
    donation_id: &str,
    provider_status: &str,
) -> Result<()> {
    conn.execute(
        "UPDATE donations SET provider_status = ?2, updated_at = ?3 WHERE id = ?1",
        params![donation_id, provider_status, now()],
    )?;
    Ok(())
}

pub fn list_donations(
    conn: &Connection,
    filters: &DonationFilters,
    limit: i64,
    skip: i64,
) -> Result<(Vec<Donation>, i64)> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(ref campaign_id) = filters.campaign_id {
        clauses.push("campaign_id = ?");
        params.push(campaign_id.clone().into());
    }
    if let Some(status) = filters.status {
        clauses.push("status = ?");
        params.push(status.as_str().to_string().into());
    }
    if let Some(from) = filters.date_from {
        clauses.push("created_at >= ?");
        params.push(from.into());
    }
    if let Some(to) = filters.date_to {
        clauses.push("created_at <= ?");
        params.push(to.into());
    }
    if let Some(min) = filters.min_amount {
        clauses.push("amount >= ?");
        params.push(min.into());
    }
    if let Some(max) = filters.max_amount {
        clauses.push("amount <= ?");
        params.push(max.into());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    list_page(
        conn,
        "donations",
        DONATION_COLS,
        &where_sql,
        "ORDER BY created_at DESC",
        params,
        limit,
        skip,
    )
}

/// Compare-and-set status write for the webhook reconciler.
///
/// The UPDATE is conditioned on the status the reconciler observed, so two
/// concurrent deliveries for one session cannot both win; the loser sees
/// zero affected rows and must re-read. The campaign `raised_amount`
/// adjustment rides in the same transaction as the status write.
///
/// Returns false when the row no longer holds `expected` (lost race).
pub fn reconcile_donation(
    conn: &mut Connection,
    donation_id: &str,
    expected: DonationStatus,
    next: DonationStatus,
    provider_status: &str,
) -> Result<bool> {
    let tx = conn.transaction()?;

    let affected = tx.execute(
        "UPDATE donations SET status = ?3, provider_status = ?4, updated_at = ?5
         WHERE id = ?1 AND status = ?2",
        params![
            donation_id,
            expected.as_str(),
            next.as_str(),
            provider_status,
            now()
        ],
    )?;

    if affected == 0 {
        return Ok(false);
    }

    // Keep the campaign accumulator in lockstep with the status history:
    // confirmation adds the amount, refund-after-confirmation removes it.
    // A refund straight out of pending never added anything, so there is
    // nothing to subtract.
    let delta_sql = match (expected, next) {
        (DonationStatus::Pending, DonationStatus::Confirmed) => Some(
            "UPDATE campaigns SET raised_amount = raised_amount + ?2, updated_at = ?3
             WHERE id = (SELECT campaign_id FROM donations WHERE id = ?1)",
        ),
        (DonationStatus::Confirmed, DonationStatus::Refunded) => Some(
            "UPDATE campaigns SET raised_amount = raised_amount - ?2, updated_at = ?3
             WHERE id = (SELECT campaign_id FROM donations WHERE id = ?1)",
        ),
        _ => None,
    };

    if let Some(sql) = delta_sql {
        let amount: i64 = tx.query_row(
            "SELECT amount FROM donations WHERE id = ?1",
            params![donation_id],
            |row| row.get(0),
        )?;
        tx.execute(sql, params![donation_id, amount, now()])?;
    }

    tx.commit()?;
    Ok(true)
}

// ============ Stats ============

/// Aggregate counts for the admin dashboard.
#[derive(Debug, serde::Serialize)]
pub struct DashboardStats {
    pub services: i64,
    pub projects: i64,
    pub inquiries: i64,
    pub testimonials: i64,
    pub subscribers: i64,
    pub campaigns: i64,
    pub donations: i64,
    /// Sum of confirmed donation amounts (major units, mixed currencies)
    pub confirmed_donation_total: i64,
}

pub fn dashboard_stats(conn: &Connection) -> Result<DashboardStats> {
    let count = |table: &str| -> Result<i64> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .map_err(Into::into)
    };

    let confirmed_donation_total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM donations WHERE status = 'confirmed'",
        [],
        |row| row.get(0),
    )?;

    Ok(DashboardStats {
        services: count("services")?,
        projects: count("projects")?,
        inquiries: count("inquiries")?,
        testimonials: count("testimonials")?,
        subscribers: count("subscribers")?,
        campaigns: count("campaigns")?,
        donations: count("donations")?,
        confirmed_donation_total,
    })
}
