pub mod admin_settings;

pub use admin_settings::AdminSettings;
