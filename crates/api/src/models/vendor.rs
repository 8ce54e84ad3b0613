//! Vendor domain types.

use serde::Serialize;

use nearshop_core::{Email, VendorId};

/// A registered vendor (domain type).
///
/// The password hash is never part of this type; it only leaves the
/// repository through [`crate::db::VendorRepository::get_password_hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Vendor {
    /// Unique vendor ID.
    pub id: VendorId,
    /// Display name.
    pub name: String,
    /// Normalized login email.
    pub email: Email,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_json_has_no_password() {
        let vendor = Vendor {
            id: VendorId::new(1),
            name: "V".to_string(),
            email: Email::parse("v@e.com").unwrap(),
        };

        let json = serde_json::to_value(&vendor).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "V", "email": "v@e.com"})
        );
    }
}
