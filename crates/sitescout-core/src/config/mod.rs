mod settings;

pub use settings::{
    BackendSettings, Command, Config, Settings, UiSettings, ENV_API_BASE, ENV_BASE_URL,
};
