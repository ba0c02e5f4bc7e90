pub mod dispatch;
pub mod fingerprint;
pub mod hint_model;
pub mod labels;
pub mod mode;
pub mod overlay;
pub mod regional;
pub mod resolver;
pub mod scanner;
pub mod visibility;
