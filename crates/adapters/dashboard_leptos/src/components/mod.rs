mod chart_modal;
mod data_table;
mod device_cards;
mod mode_select;
mod orientation;
mod settings_menu;

pub use chart_modal::ChartModal;
pub use data_table::DataTable;
pub use device_cards::DeviceCards;
pub use mode_select::ModeSelect;
pub use orientation::{OrientationPage, open_viewer};
pub use settings_menu::SettingsMenu;
