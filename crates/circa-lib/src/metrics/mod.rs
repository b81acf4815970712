pub mod amplitude;
pub mod summary;
pub mod variability;
pub mod window;

pub use amplitude::relative_amplitude;
pub use summary::{summarize, RhythmSummary};
pub use variability::intradaily_variability;
pub use window::{find_window_extremum, l_statistic, m_statistic};
