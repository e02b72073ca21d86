use rust_decimal::Decimal;

/// Units traded in a single transaction; always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(Decimal);

impl Volume {
    pub fn new(value: Decimal) -> Result<Self, String> {
        if value > Decimal::ZERO {
            Ok(Volume(value))
        } else {
            Err("Volume must be greater than 0".to_string())
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
