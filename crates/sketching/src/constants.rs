/// Lengths below this are treated as zero when normalizing directions.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// Control point distance for a quarter-ellipse cubic Bézier (4/3 * (sqrt(2) - 1)).
pub const ELLIPSE_KAPPA: f64 = 0.552_284_749_830_793_4;
