//! Explicit first-run setup, kept out of the request path.

use anyhow::Result;
use tracing::info;

use crate::Database;
use crate::password::hash_password;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_NAME: &str = "Demo User";

/// Creates the demo account if the database has no users yet.
/// Returns the new user's id, or `None` when nothing was seeded.
pub fn seed_demo_user(db: &Database) -> Result<Option<i64>> {
    if db.count_users()? > 0 {
        return Ok(None);
    }

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let id = db.create_user(DEMO_USERNAME, DEMO_NAME, &password_hash)?;
    info!("Seeded demo user '{}' (id {})", DEMO_USERNAME, id);
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;

    #[test]
    fn seeds_once() {
        let db = Database::open_in_memory().unwrap();
        let id = seed_demo_user(&db).unwrap().unwrap();
        assert_eq!(seed_demo_user(&db).unwrap(), None);

        let user = db.get_user_by_username(DEMO_USERNAME).unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name, DEMO_NAME);
        assert!(verify_password(DEMO_PASSWORD, &user.password).unwrap());
    }

    #[test]
    fn skips_when_any_user_exists() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("someone", "Someone", "hash").unwrap();
        assert_eq!(seed_demo_user(&db).unwrap(), None);
        assert!(db.get_user_by_username(DEMO_USERNAME).unwrap().is_none());
    }
}
