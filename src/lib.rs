use ordered_float::OrderedFloat;

pub mod animation;
pub mod bars;
pub mod candles;
pub mod equity;
pub mod generator;
mod ohlc;
pub mod scale;
pub mod scroll;
pub mod surface;
pub mod terminal;
mod theme;
pub mod tilt;
pub mod typewriter;

pub use animation::{Animation, Driver, LoopState, Pointer, Viewport};
pub use bars::PulsingBars;
pub use candles::{CandleStickChart, Layout};
pub use equity::EquityCurve;
pub use generator::{EquityWalk, SeriesGenerator, WalkParams};
pub use ohlc::{CandleType, Ohlc};
pub use scroll::{ScrollConfig, ScrollLoop};
pub use surface::{Recorder, Surface};
pub use terminal::SurfaceWidget;
pub use theme::{Theme, DEFAULT_DOWN, DEFAULT_UP};
pub use tilt::Tilt;
pub use typewriter::Typewriter;

pub(crate) type Float = OrderedFloat<f64>;
