pub mod availability;
pub mod bookings;
pub mod car;
pub mod customer;
pub mod response;
pub mod settings;
pub mod user;

/// Fresh document id, the hex form of a BSON ObjectId.
pub fn new_id() -> String {
    bson::oid::ObjectId::new().to_hex()
}
