//! Repositories for hero carousel slides and payment QR codes.

use sqlx::PgPool;

use dopetech_core::{HeroImage, HeroImageId, QrCode, QrCodeId};

use super::RepositoryError;

const HERO_COLUMNS: &str = "id, title, subtitle, description, image_url, show_content, \
     display_order, created_at, updated_at";

/// Fields for creating or replacing a hero slide.
#[derive(Debug, Clone)]
pub struct NewHeroImage {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_url: String,
    pub show_content: bool,
    pub display_order: i32,
}

/// Repository for hero carousel database operations.
pub struct HeroImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HeroImageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List slides in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<HeroImage>, RepositoryError> {
        let slides = sqlx::query_as::<_, HeroImage>(&format!(
            "SELECT {HERO_COLUMNS} FROM hero_images ORDER BY display_order, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(slides)
    }

    /// Insert a slide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewHeroImage) -> Result<HeroImage, RepositoryError> {
        let slide = sqlx::query_as::<_, HeroImage>(&format!(
            "INSERT INTO hero_images \
                 (title, subtitle, description, image_url, show_content, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {HERO_COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.subtitle)
        .bind(&new.description)
        .bind(&new.image_url)
        .bind(new.show_content)
        .bind(new.display_order)
        .fetch_one(self.pool)
        .await?;

        Ok(slide)
    }

    /// Replace a slide's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such slide exists.
    pub async fn update(
        &self,
        id: HeroImageId,
        new: &NewHeroImage,
    ) -> Result<HeroImage, RepositoryError> {
        sqlx::query_as::<_, HeroImage>(&format!(
            "UPDATE hero_images SET \
                 title = $2, subtitle = $3, description = $4, image_url = $5, \
                 show_content = $6, display_order = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING {HERO_COLUMNS}"
        ))
        .bind(id)
        .bind(&new.title)
        .bind(&new.subtitle)
        .bind(&new.description)
        .bind(&new.image_url)
        .bind(new.show_content)
        .bind(new.display_order)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a slide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such slide exists.
    pub async fn delete(&self, id: HeroImageId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM hero_images WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Repository for payment QR code database operations.
pub struct QrCodeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QrCodeRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List QR codes; `active_only` restricts to currently-enabled codes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<QrCode>, RepositoryError> {
        let sql = if active_only {
            "SELECT id, name, image_url, is_active, created_at \
             FROM qr_codes WHERE is_active ORDER BY id"
        } else {
            "SELECT id, name, image_url, is_active, created_at FROM qr_codes ORDER BY id"
        };

        let codes = sqlx::query_as::<_, QrCode>(sql).fetch_all(self.pool).await?;

        Ok(codes)
    }

    /// Insert a QR code (active by default).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &str, image_url: &str) -> Result<QrCode, RepositoryError> {
        let code = sqlx::query_as::<_, QrCode>(
            "INSERT INTO qr_codes (name, image_url, is_active) VALUES ($1, $2, TRUE) \
             RETURNING id, name, image_url, is_active, created_at",
        )
        .bind(name)
        .bind(image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(code)
    }

    /// Patch a QR code's name and/or active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such code exists.
    pub async fn update(
        &self,
        id: QrCodeId,
        name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<QrCode, RepositoryError> {
        sqlx::query_as::<_, QrCode>(
            "UPDATE qr_codes SET \
                 name = COALESCE($2, name), \
                 is_active = COALESCE($3, is_active) \
             WHERE id = $1 \
             RETURNING id, name, image_url, is_active, created_at",
        )
        .bind(id)
        .bind(name)
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a QR code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such code exists.
    pub async fn delete(&self, id: QrCodeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
