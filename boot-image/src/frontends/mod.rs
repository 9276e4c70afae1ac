mod properties;
mod settings_file;

pub use properties::{parse_property, Environment, Properties};
pub use settings_file::{find_settings_file, ImageSettings, LabelSettings, SettingsFile, YamlSettingsFrontend};
