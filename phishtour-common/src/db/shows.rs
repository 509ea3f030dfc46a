//! Show persistence
//!
//! Shows are the unit the song-history aggregation resolves track records
//! into; the table doubles as the local cache in front of the phish.in API.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use sqlx::{Row, SqlitePool};

/// A fully resolved show: identifier, calendar date parts, and venue info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub show_id: i64,
    /// Raw date string, YYYY-MM-DD
    pub date: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub venue: String,
    pub city: String,
}

impl Show {
    /// Build a show from a YYYY-MM-DD date string
    pub fn from_date(show_id: i64, date: &str, venue: String, city: String) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| Error::Parse(format!("Invalid show date {:?}: {}", date, e)))?;

        Ok(Self {
            show_id,
            date: date.to_string(),
            year: parsed.year(),
            month: parsed.month(),
            day: parsed.day(),
            venue,
            city,
        })
    }

    /// Human-readable date label, e.g. "November 2, 1997"
    ///
    /// Falls back to the raw date string if the stored parts are not a
    /// real calendar date (a cache row with a sentinel year, for one).
    pub fn date_label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, self.day) {
            Some(d) => d.format("%B %-d, %Y").to_string(),
            None => self.date.clone(),
        }
    }
}

/// Save show to database (upsert by show id)
pub async fn save_show(pool: &SqlitePool, show: &Show) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shows (show_id, date, year, month, day, venue, city, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(show_id) DO UPDATE SET
            date = excluded.date,
            year = excluded.year,
            month = excluded.month,
            day = excluded.day,
            venue = excluded.venue,
            city = excluded.city,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(show.show_id)
    .bind(&show.date)
    .bind(show.year)
    .bind(show.month as i64)
    .bind(show.day as i64)
    .bind(&show.venue)
    .bind(&show.city)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load show by id; `Ok(None)` on a genuine miss
pub async fn load_show(pool: &SqlitePool, show_id: i64) -> Result<Option<Show>> {
    let row = sqlx::query(
        r#"
        SELECT show_id, date, year, month, day, venue, city
        FROM shows
        WHERE show_id = ?
        "#,
    )
    .bind(show_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Show {
        show_id: row.get("show_id"),
        date: row.get("date"),
        year: row.get::<i64, _>("year") as i32,
        month: row.get::<i64, _>("month") as u32,
        day: row.get::<i64, _>("day") as u32,
        venue: row.get("venue"),
        city: row.get("city"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    #[test]
    fn test_show_from_date_splits_parts() {
        let show = Show::from_date(
            1252,
            "1997-11-22",
            "Hampton Coliseum".to_string(),
            "Hampton, VA".to_string(),
        )
        .unwrap();

        assert_eq!(show.year, 1997);
        assert_eq!(show.month, 11);
        assert_eq!(show.day, 22);
        assert_eq!(show.date_label(), "November 22, 1997");
    }

    #[test]
    fn test_show_from_bad_date_is_parse_error() {
        let result = Show::from_date(1, "not-a-date", String::new(), String::new());
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn test_save_and_load_show() {
        let pool = init_memory_database().await.unwrap();

        let show = Show::from_date(
            1319,
            "1998-04-05",
            "Providence Civic Center".to_string(),
            "Providence, RI".to_string(),
        )
        .unwrap();

        save_show(&pool, &show).await.expect("Failed to save show");

        let loaded = load_show(&pool, 1319)
            .await
            .expect("Failed to load show")
            .expect("Show not found");

        assert_eq!(loaded, show);
    }

    #[tokio::test]
    async fn test_load_missing_show_is_none() {
        let pool = init_memory_database().await.unwrap();
        assert!(load_show(&pool, 999_999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_show_upserts() {
        let pool = init_memory_database().await.unwrap();

        let mut show =
            Show::from_date(77, "1995-12-31", "Madison Square Garden".to_string(), "New York, NY".to_string())
                .unwrap();
        save_show(&pool, &show).await.unwrap();

        show.venue = "MSG".to_string();
        save_show(&pool, &show).await.unwrap();

        let loaded = load_show(&pool, 77).await.unwrap().unwrap();
        assert_eq!(loaded.venue, "MSG");
    }
}
