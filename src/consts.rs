//! Mathematical constants

/// 0.5 ln(2π)
pub const HALF_LN_2PI: f64 = 0.918_938_533_204_672_7;
/// ln(2π)
pub const LN_2PI: f64 = 1.837_877_066_409_345_3;
/// √3
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;
/// 1/φ, the inverse golden ratio
pub const INV_PHI: f64 = 0.618_033_988_749_894_9;
