//! Sensor-response calibration: rational curve model and least-squares fit

mod fit;
mod model;

pub use fit::{fit, fit_with_config, FitConfig};
pub use model::{
    CalibrationError, CalibrationModel, InputShapeError, EVAL_EPSILON, MIN_CALIBRATION_POINTS,
};
