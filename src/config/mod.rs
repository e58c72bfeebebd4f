mod defaults;
mod io;
mod schema;
mod validate;

pub use io::{load_config, load_config_or_default};
pub use schema::{Analysis, Config, Export, History, LogRetention, Simulation, SimulationProfile};
pub use validate::ConfigError;
