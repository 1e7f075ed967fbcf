use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tokio::sync::Mutex;

use crate::db::models::{GiveawayRecord, NewGiveaway};
use crate::error::Result;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Durable storage for giveaways and their participants. The store is
// the sole owner of persisted state: the lifecycle controller holds
// nothing that can't be reconstructed by querying it again.
pub struct GiveawayStore {
    conn: Mutex<Connection>,
}

impl GiveawayStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    // An in-memory database with the same schema. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_schema(&conn)?;
        Ok(GiveawayStore {
            conn: Mutex::new(conn),
        })
    }

    // Inserts a new giveaway and returns its identifier.
    pub async fn create_giveaway(&self, giveaway: &NewGiveaway) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO giveaways \
             (guild_id, channel_id, message_id, prize, winner_count, end_time, \
              created_by, requirements, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                giveaway.guild_id as i64,
                giveaway.channel_id as i64,
                giveaway.message_id as i64,
                giveaway.prize,
                giveaway.winner_count,
                giveaway.end_time,
                giveaway.created_by as i64,
                giveaway.requirements,
                giveaway.created_at,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    // Registers a participant. Returns false when the (giveaway, user)
    // pair already exists; a repeated join is not an error.
    pub async fn add_participant(
        &self,
        giveaway_id: i64,
        user_id: u64,
        joined_at: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO giveaway_participants (giveaway_id, user_id, joined_at) \
             VALUES (?1, ?2, ?3)",
            params![giveaway_id, user_id as i64, joined_at],
        )?;

        Ok(changed == 1)
    }

    pub async fn get_giveaway(&self, giveaway_id: i64) -> Result<Option<GiveawayRecord>> {
        let conn = self.conn.lock().await;
        let record = conn
            .query_row(
                "SELECT id, guild_id, channel_id, message_id, prize, winner_count, \
                 end_time, created_by, requirements, active, created_at \
                 FROM giveaways WHERE id = ?1",
                params![giveaway_id],
                row_to_giveaway,
            )
            .optional()?;

        Ok(record)
    }

    // Looks a giveaway up by the announcement message within a guild.
    // Used by the manual `end` command and the join button.
    pub async fn get_giveaway_by_message(
        &self,
        guild_id: u64,
        message_id: u64,
    ) -> Result<Option<GiveawayRecord>> {
        let conn = self.conn.lock().await;
        let record = conn
            .query_row(
                "SELECT id, guild_id, channel_id, message_id, prize, winner_count, \
                 end_time, created_by, requirements, active, created_at \
                 FROM giveaways WHERE guild_id = ?1 AND message_id = ?2",
                params![guild_id as i64, message_id as i64],
                row_to_giveaway,
            )
            .optional()?;

        Ok(record)
    }

    // Every giveaway that hasn't gone through the end transition yet,
    // expired or not. Filtering by expiry is the controller's job so
    // that the policy lives in one place. No order is guaranteed.
    pub async fn list_active(&self) -> Result<Vec<GiveawayRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, guild_id, channel_id, message_id, prize, winner_count, \
             end_time, created_by, requirements, active, created_at \
             FROM giveaways WHERE active = 1",
        )?;

        let rows = stmt.query_map([], row_to_giveaway)?;
        let mut giveaways = Vec::new();
        for row in rows {
            giveaways.push(row?);
        }

        Ok(giveaways)
    }

    // The guild-scoped listing backing the `/giveaway list` command.
    pub async fn list_active_for_guild(&self, guild_id: u64) -> Result<Vec<GiveawayRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, guild_id, channel_id, message_id, prize, winner_count, \
             end_time, created_by, requirements, active, created_at \
             FROM giveaways WHERE guild_id = ?1 AND active = 1 ORDER BY end_time ASC",
        )?;

        let rows = stmt.query_map(params![guild_id as i64], row_to_giveaway)?;
        let mut giveaways = Vec::new();
        for row in rows {
            giveaways.push(row?);
        }

        Ok(giveaways)
    }

    pub async fn list_participants(&self, giveaway_id: i64) -> Result<Vec<u64>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT user_id FROM giveaway_participants WHERE giveaway_id = ?1",
        )?;

        let rows = stmt.query_map(params![giveaway_id], |row| {
            let user_id: i64 = row.get(0)?;
            Ok(user_id as u64)
        })?;

        let mut participants = Vec::new();
        for row in rows {
            participants.push(row?);
        }

        Ok(participants)
    }

    // Flips the giveaway from active to ended as a single conditional
    // update. The returned flag tells the caller whether this call was
    // the one that performed the transition; concurrent callers get
    // false and must not announce anything.
    pub async fn mark_ended(&self, giveaway_id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE giveaways SET active = 0 WHERE id = ?1 AND active = 1",
            params![giveaway_id],
        )?;

        Ok(changed == 1)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS giveaways (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            guild_id INTEGER NOT NULL,
            channel_id INTEGER NOT NULL,
            message_id INTEGER NOT NULL UNIQUE,
            prize TEXT NOT NULL,
            winner_count INTEGER NOT NULL DEFAULT 1,
            end_time TEXT NOT NULL,
            created_by INTEGER NOT NULL,
            requirements TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS giveaway_participants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            giveaway_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            joined_at TEXT NOT NULL,
            FOREIGN KEY (giveaway_id) REFERENCES giveaways(id) ON DELETE CASCADE,
            UNIQUE (giveaway_id, user_id)
        )",
        [],
    )?;

    Ok(())
}

fn row_to_giveaway(row: &Row) -> rusqlite::Result<GiveawayRecord> {
    let guild_id: i64 = row.get(1)?;
    let channel_id: i64 = row.get(2)?;
    let message_id: i64 = row.get(3)?;
    let created_by: i64 = row.get(7)?;

    Ok(GiveawayRecord {
        id: row.get(0)?,
        guild_id: guild_id as u64,
        channel_id: channel_id as u64,
        message_id: message_id as u64,
        prize: row.get(4)?,
        winner_count: row.get(5)?,
        end_time: row.get(6)?,
        created_by: created_by as u64,
        requirements: row.get(8)?,
        active: row.get(9)?,
        created_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::db::models::NewGiveaway;
    use crate::db::store::GiveawayStore;

    fn get_giveaway(message_id: u64) -> NewGiveaway {
        let now = Utc::now();
        NewGiveaway {
            guild_id: 100,
            channel_id: 200,
            message_id,
            prize: "Game key".to_string(),
            winner_count: 1,
            end_time: now + Duration::hours(1),
            created_by: 1,
            requirements: None,
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_giveaway() {
        let store = GiveawayStore::open_in_memory().unwrap();

        let giveaway_id = store.create_giveaway(&get_giveaway(300)).await.unwrap();
        let record = store.get_giveaway(giveaway_id).await.unwrap().unwrap();

        assert_eq!(record.id, giveaway_id);
        assert_eq!(record.guild_id, 100);
        assert_eq!(record.channel_id, 200);
        assert_eq!(record.message_id, 300);
        assert_eq!(record.prize, "Game key".to_string());
        assert_eq!(record.winner_count, 1);
        assert_eq!(record.requirements, None);
        assert_eq!(record.active, true);
    }

    #[tokio::test]
    async fn test_get_giveaway_returns_none_for_unknown_id() {
        let store = GiveawayStore::open_in_memory().unwrap();

        let record = store.get_giveaway(10).await.unwrap();
        assert_eq!(record.is_none(), true);
    }

    #[tokio::test]
    async fn test_get_giveaway_by_message() {
        let store = GiveawayStore::open_in_memory().unwrap();
        let giveaway_id = store.create_giveaway(&get_giveaway(300)).await.unwrap();

        let record = store.get_giveaway_by_message(100, 300).await.unwrap();
        assert_eq!(record.unwrap().id, giveaway_id);

        let other_guild = store.get_giveaway_by_message(101, 300).await.unwrap();
        assert_eq!(other_guild.is_none(), true);
    }

    #[tokio::test]
    async fn test_add_participant_is_idempotent() {
        let store = GiveawayStore::open_in_memory().unwrap();
        let giveaway_id = store.create_giveaway(&get_giveaway(300)).await.unwrap();

        let first_join = store
            .add_participant(giveaway_id, 42, Utc::now())
            .await
            .unwrap();
        assert_eq!(first_join, true);

        let second_join = store
            .add_participant(giveaway_id, 42, Utc::now())
            .await
            .unwrap();
        assert_eq!(second_join, false);

        let participants = store.list_participants(giveaway_id).await.unwrap();
        assert_eq!(participants, vec![42]);
    }

    #[tokio::test]
    async fn test_same_user_can_join_different_giveaways() {
        let store = GiveawayStore::open_in_memory().unwrap();
        let first_id = store.create_giveaway(&get_giveaway(300)).await.unwrap();
        let second_id = store.create_giveaway(&get_giveaway(301)).await.unwrap();

        let joined_first = store.add_participant(first_id, 42, Utc::now()).await.unwrap();
        let joined_second = store.add_participant(second_id, 42, Utc::now()).await.unwrap();
        assert_eq!(joined_first, true);
        assert_eq!(joined_second, true);
    }

    #[tokio::test]
    async fn test_mark_ended_changes_state_only_once() {
        let store = GiveawayStore::open_in_memory().unwrap();
        let giveaway_id = store.create_giveaway(&get_giveaway(300)).await.unwrap();

        let first_transition = store.mark_ended(giveaway_id).await.unwrap();
        assert_eq!(first_transition, true);

        let second_transition = store.mark_ended(giveaway_id).await.unwrap();
        assert_eq!(second_transition, false);

        let record = store.get_giveaway(giveaway_id).await.unwrap().unwrap();
        assert_eq!(record.active, false);
    }

    #[tokio::test]
    async fn test_list_active_skips_ended_giveaways() {
        let store = GiveawayStore::open_in_memory().unwrap();
        let first_id = store.create_giveaway(&get_giveaway(300)).await.unwrap();
        let second_id = store.create_giveaway(&get_giveaway(301)).await.unwrap();

        store.mark_ended(first_id).await.unwrap();

        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second_id);
    }

    #[tokio::test]
    async fn test_list_active_keeps_expired_giveaways() {
        let store = GiveawayStore::open_in_memory().unwrap();
        let mut giveaway = get_giveaway(300);
        giveaway.end_time = Utc::now() - Duration::hours(1);
        store.create_giveaway(&giveaway).await.unwrap();

        // Expiry filtering belongs to the controller, not the store.
        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_list_active_for_guild_is_ordered_by_end_time() {
        let store = GiveawayStore::open_in_memory().unwrap();

        let mut late = get_giveaway(300);
        late.end_time = Utc::now() + Duration::hours(5);
        let late_id = store.create_giveaway(&late).await.unwrap();

        let mut soon = get_giveaway(301);
        soon.end_time = Utc::now() + Duration::hours(1);
        let soon_id = store.create_giveaway(&soon).await.unwrap();

        let mut other_guild = get_giveaway(302);
        other_guild.guild_id = 999;
        store.create_giveaway(&other_guild).await.unwrap();

        let active = store.list_active_for_guild(100).await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, soon_id);
        assert_eq!(active[1].id, late_id);
    }

    #[tokio::test]
    async fn test_list_participants_for_a_new_giveaway() {
        let store = GiveawayStore::open_in_memory().unwrap();
        let giveaway_id = store.create_giveaway(&get_giveaway(300)).await.unwrap();

        let participants = store.list_participants(giveaway_id).await.unwrap();
        assert_eq!(participants.is_empty(), true);
    }
}
