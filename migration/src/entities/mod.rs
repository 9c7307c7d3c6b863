pub mod admin;
pub mod hostel;

pub use admin::Entity as AdminEntity;
pub use hostel::Entity as HostelEntity;
