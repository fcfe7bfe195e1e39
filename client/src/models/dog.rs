use serde::{Deserialize, Serialize};

use crate::models::{FileUpload, MultipartForm};

/// 会员登记的犬只
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub vaccine_expires_at: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
}

/// 新增犬只 (multipart: 照片与疫苗证明)
#[derive(Debug, Clone)]
pub struct NewDog {
    pub name: String,
    pub breed: Option<String>,
    pub weight: Option<f64>,
    pub birth_date: Option<String>,
    pub photo: Option<FileUpload>,
    pub vaccine_certificate: FileUpload,
}

impl NewDog {
    pub fn into_form(self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("name", self.name)
            .optional_text("breed", self.breed)
            .optional_text("weight", self.weight)
            .optional_text("birth_date", self.birth_date);
        let form = match self.photo {
            Some(photo) => form.file("photo", photo),
            None => form,
        };
        form.file("vaccine_certificate", self.vaccine_certificate)
    }
}

/// 犬只信息更新
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DogUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}
