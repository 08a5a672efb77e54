use crate::errors::BookingError;

pub const WHATSAPP_NUMBER: &str = "01111132621";
pub const WASH_PRICE_EGP: u32 = 50;

const INQUIRY_MESSAGE: &str = "مرحباً، أريد الاستفسار عن خدمة غسيل السيارة";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarWashBooking {
    pub car_type: String,
    pub washing_type: String,
}

impl CarWashBooking {
    pub fn new(car_type: impl Into<String>, washing_type: impl Into<String>) -> Self {
        Self {
            car_type: car_type.into(),
            washing_type: washing_type.into(),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "مرحباً، أريد حجز خدمة غسيل السيارة:\n\nنوع السيارة: {}\nنوع الغسيل: {}\n\nالسعر: {WASH_PRICE_EGP} جنيه",
            self.car_type, self.washing_type
        )
    }

    pub fn whatsapp_link(&self) -> Result<String, BookingError> {
        if self.car_type.trim().is_empty() || self.washing_type.trim().is_empty() {
            return Err(BookingError::MissingFields);
        }
        Ok(whatsapp_url(&self.message()))
    }
}

pub fn inquiry_link() -> String {
    whatsapp_url(INQUIRY_MESSAGE)
}

fn whatsapp_url(text: &str) -> String {
    format!(
        "https://wa.me/+2{WHATSAPP_NUMBER}?text={}",
        urlencoding::encode(text)
    )
}
