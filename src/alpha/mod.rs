//! Alpha signal provider. Ten base signals plus seven extended signals
//! gated by `AlphaConfig::enable_extended_signals`, each a pure
//! function of player features, league context, and resolved feed
//! data.

pub mod context;
pub mod provider;
pub mod signals;

pub use context::{recent_form_confidence, SignalContext};
pub use provider::{AlphaAdjustment, AlphaSignalProvider, SignalContribution};
pub use signals::{SignalOutput, SignalSpec, BASE_SIGNALS, EXTENDED_SIGNALS};
