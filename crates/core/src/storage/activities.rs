//! Activity log storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::parse::{parse_datetime, parse_uuid};
use crate::error::Result;
use crate::models::Activity;

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        activity_type: row.get(1)?,
        description: row.get(2)?,
        room_number: row.get(3)?,
        guest_name: row.get(4)?,
        amount: row.get(5)?,
        timestamp: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

pub struct ActivityStore<'a> {
    conn: &'a Connection,
}

impl<'a> ActivityStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append an activity. The log is append-only: there is no update or
    /// delete path.
    #[instrument(skip(self, activity), fields(activity_type = %activity.activity_type))]
    pub fn log(&self, activity: &Activity) -> Result<()> {
        self.conn.execute(
            "INSERT INTO activities (id, activity_type, description, room_number,
                 guest_name, amount, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                activity.id.to_string(),
                activity.activity_type,
                activity.description,
                activity.room_number,
                activity.guest_name,
                activity.amount,
                activity.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Most recent activities, newest first
    #[instrument(skip(self))]
    pub fn recent(&self, limit: u32) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, activity_type, description, room_number, guest_name, amount, timestamp
             FROM activities ORDER BY timestamp DESC, id LIMIT ?1",
        )?;
        let activities = stmt
            .query_map(params![limit], activity_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(activities)
    }
}
