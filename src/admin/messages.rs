//! User-facing strings of the admin console.

use crate::upload::SelectedFile;

pub const PART_NAME_REQUIRED: &str = "اسم القطعة مطلوب";
pub const PART_PRICE_INVALID: &str = "السعر يجب أن يكون رقم موجب";
pub const PART_DESCRIPTION_REQUIRED: &str = "الوصف مطلوب";
pub const PART_BRAND_REQUIRED: &str = "الماركة مطلوبة";
pub const PART_MODEL_REQUIRED: &str = "الموديل مطلوب";
pub const PART_CREATED: &str = "تم إضافة القطعة بنجاح!";
pub const PART_UPDATED: &str = "تم تحديث القطعة بنجاح!";
pub const PART_SAVE_FAILED: &str = "فشل حفظ القطعة";
pub const PART_SAVE_ERROR: &str = "خطأ في حفظ القطعة: ";
pub const PART_DUPLICATE_GENERIC: &str =
    "توجد قطعة بنفس البيانات في قاعدة البيانات. يرجى التحقق من الاسم أو الماركة أو الموديل.";
pub const PART_DELETE_PROMPT: &str = "هل أنت متأكد من حذف هذا الجزء؟";

pub const VIDEO_DELETE_PROMPT: &str = "هل أنت متأكد من حذف هذا الفيديو؟";
pub const VIDEO_FILE_REQUIRED: &str = "Please select a video file to upload";
pub const VIDEO_TITLE_REQUIRED: &str = "Please enter a video title";
pub const VIDEO_URL_REQUIRED: &str = "Please enter a video URL";

pub const ARTICLE_TITLE_REQUIRED: &str = "عنوان المقال مطلوب";
pub const ARTICLE_AUTHOR_REQUIRED: &str = "اسم المؤلف مطلوب";
pub const ARTICLE_DESCRIPTION_REQUIRED: &str = "وصف المقال مطلوب";
pub const ARTICLE_DELETE_PROMPT: &str = "هل أنت متأكد من حذف هذا المقال؟";

pub const IMAGE_NOT_AN_IMAGE: &str = "يرجى اختيار ملف صورة فقط";

pub fn image_too_large(file: &SelectedFile) -> String {
    format!(
        "حجم الصورة كبير جداً. الحد الأقصى 5 ميجابايت. حجم الملف المحدد: {:.2} ميجابايت",
        file.size_mb()
    )
}

pub fn image_unreadable(reason: impl std::fmt::Display) -> String {
    format!("خطأ في معالجة ملف الصورة: {reason}")
}

pub fn part_duplicate(field: Option<&str>) -> String {
    let label = match field {
        Some("name") => "الاسم",
        Some("brand") => "الماركة",
        Some("model") => "الموديل",
        Some(other) => other,
        None => "البيانات",
    };
    format!("توجد قطعة بنفس {label} في قاعدة البيانات. يرجى استخدام {label} مختلف.")
}

pub fn greeting(user: &str) -> String {
    format!("مرحباً، {user}")
}

/// `noun` is plural ("parts", "videos"); the delete and save strings take the singular.
pub fn fetch_failed(noun: &str) -> String {
    format!("Failed to fetch {noun}")
}

pub fn fetch_error(noun: &str, reason: impl std::fmt::Display) -> String {
    format!("Error fetching {noun}: {reason}")
}

pub fn delete_failed(noun: &str) -> String {
    format!("Failed to delete {noun}")
}

pub fn delete_error(noun: &str, reason: impl std::fmt::Display) -> String {
    format!("Error deleting {noun}: {reason}")
}

pub fn save_failed(noun: &str) -> String {
    format!("Failed to save {noun}")
}

pub fn save_error(noun: &str, reason: impl std::fmt::Display) -> String {
    format!("Error saving {noun}: {reason}")
}
