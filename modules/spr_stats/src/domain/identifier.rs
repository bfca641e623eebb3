use crate::contract::model::{Spr, Territory};

impl Territory {
    /// Short prefix used in record identifiers. Territories without one share `UN-`.
    pub fn prefix(&self) -> &'static str {
        match self {
            Territory::CetcWest => "CW-",
            Territory::Hudson => "AH-",
            Territory::Sed => "SED-",
            Territory::Ned => "NED-",
            Territory::Pscc => "PS-",
            Territory::Chicago | Territory::Unified | Territory::Other(_) => "UN-",
        }
    }
}

/// `prefix + number`, plain decimal without padding.
pub fn format_identifier(territory: &Territory, number: i64) -> String {
    format!("{}{}", territory.prefix(), number)
}

impl Spr {
    pub fn identifier(&self) -> String {
        format_identifier(&self.territory, self.number)
    }
}
