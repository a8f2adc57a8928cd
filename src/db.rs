#[cfg(feature = "ssr")]
mod db_impl {
    use crate::models::review::{NewReview, Review};
    use chrono::{DateTime, SecondsFormat, Utc};
    use leptos::logging;
    use leptos::logging::log;
    use rusqlite::types::Type;
    use rusqlite::{Connection, Error, Row};
    use std::sync::Arc;
    use tokio::sync::Mutex;


    // Handle to the review store; clones share one connection
    #[derive(Debug, Clone)]
    pub struct Database {
        conn: Arc<Mutex<Connection>>,
    }

    const SELECT_REVIEW: &str = "SELECT id, age, job, sector, monthly_income, gender, civil_state,
                family_members, vehicle_type, vehicle_brand, fuel_type, image,
                created_at, updated_at
         FROM reviews";

    impl Database {
        // Open a database connection
        pub fn new(db_path: &str) -> Result<Self, Error> {
            let conn = Connection::open(db_path)?;
            logging::log!("Database connection established at: {}", db_path);
            Ok(Database {
                conn: Arc::new(Mutex::new(conn)),
            })
        }

        // Create the database schema
        pub async fn create_schema(&self) -> Result<(), Error> {
            let conn = self.conn.lock().await;

            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS reviews (
                    id TEXT PRIMARY KEY,
                    age INTEGER NOT NULL,
                    job TEXT NOT NULL,
                    sector TEXT NOT NULL,
                    monthly_income REAL NOT NULL,
                    gender TEXT NOT NULL,
                    civil_state TEXT NOT NULL,
                    family_members INTEGER NOT NULL,
                    vehicle_type TEXT NOT NULL,
                    vehicle_brand TEXT NOT NULL,
                    fuel_type TEXT NOT NULL,
                    image TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS reviews_created_at ON reviews (created_at);",
            )
            .map_err(|e| {
                logging::error!("Failed creating reviews table: {}", e);
                e
            })?;
            Ok(())
        }

        pub async fn insert_review(&self, review: &Review) -> Result<(), Error> {
            let conn = self.conn.lock().await;
            let fields = &review.fields;
            conn.execute(
                "INSERT INTO reviews (
                    id, age, job, sector, monthly_income, gender, civil_state,
                    family_members, vehicle_type, vehicle_brand, fuel_type, image,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    &review.id,
                    fields.age,
                    &fields.job,
                    &fields.sector,
                    fields.monthly_income,
                    &fields.gender,
                    &fields.civil_state,
                    fields.family_members,
                    &fields.vehicle_type,
                    &fields.vehicle_brand,
                    &fields.fuel_type,
                    &review.image,
                    format_timestamp(&review.created_at),
                    format_timestamp(&review.updated_at),
                ],
            )?;
            log!("[DB] Review inserted: {}", review.id);
            Ok(())
        }

        // Every review, newest first; rowid breaks ties between equal timestamps
        pub async fn get_reviews(&self) -> Result<Vec<Review>, Error> {
            let conn = self.conn.lock().await;
            let mut stmt =
                conn.prepare(&format!("{SELECT_REVIEW} ORDER BY created_at DESC, rowid DESC"))?;
            let rows = stmt.query_map([], review_from_row)?;

            let mut reviews = Vec::new();
            for row in rows {
                reviews.push(row?);
            }
            log!("[DB] Fetched {} reviews from the database", reviews.len());
            Ok(reviews)
        }

        pub async fn get_review(&self, id: &str) -> Result<Option<Review>, Error> {
            let conn = self.conn.lock().await;
            select_review(&conn, id)
        }

        // Look up and remove in one transaction, returning what was removed
        pub async fn delete_review(&self, id: &str) -> Result<Option<Review>, Error> {
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;

            let review = match select_review(&tx, id)? {
                Some(review) => review,
                None => return Ok(None),
            };
            tx.execute("DELETE FROM reviews WHERE id = ?", [id])?;
            tx.commit()?;

            log!("[DB] Review deleted: {}", id);
            Ok(Some(review))
        }

        // Close the connection once no other handle shares it
        pub async fn close(self) -> Result<(), Error> {
            match Arc::try_unwrap(self.conn) {
                Ok(conn) => {
                    conn.into_inner().close().map_err(|(_, e)| e)?;
                    log!("[DB] Database connection closed");
                }
                Err(_) => log!("[DB] Connection still shared, leaving it open"),
            }
            Ok(())
        }
    }

    fn select_review(conn: &Connection, id: &str) -> Result<Option<Review>, Error> {
        match conn.query_row(&format!("{SELECT_REVIEW} WHERE id = ?"), [id], review_from_row) {
            Ok(review) => Ok(Some(review)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn review_from_row(row: &Row<'_>) -> Result<Review, Error> {
        Ok(Review {
            id: row.get(0)?,
            fields: NewReview {
                age: row.get(1)?,
                job: row.get(2)?,
                sector: row.get(3)?,
                monthly_income: row.get(4)?,
                gender: row.get(5)?,
                civil_state: row.get(6)?,
                family_members: row.get(7)?,
                vehicle_type: row.get(8)?,
                vehicle_brand: row.get(9)?,
                fuel_type: row.get(10)?,
            },
            image: row.get(11)?,
            created_at: parse_timestamp(row, 12)?,
            updated_at: parse_timestamp(row, 13)?,
        })
    }

    // Fixed-width UTC form, so text order matches time order
    fn format_timestamp(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>, Error> {
        let raw: String = row.get(idx)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|e| Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    }
}

#[cfg(feature = "ssr")]
pub use db_impl::Database;
