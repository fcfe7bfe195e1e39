use serde::{Deserialize, Serialize};

use crate::models::{FileUpload, MultipartForm};

/// 社区帖子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 帖子列表查询参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub tag: Option<String>,
}

impl PostQuery {
    /// 拼接为查询字符串,无参数时返回空串
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(format!("page={}", page));
        }
        if let Some(limit) = self.limit {
            pairs.push(format!("limit={}", limit));
        }
        if let Some(ref tag) = self.tag {
            pairs.push(format!("tag={}", urlencoding::encode(tag)));
        }
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

/// 新帖子 (multipart,可附多张图片)
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub content: String,
    pub tags: Vec<String>,
    pub images: Vec<FileUpload>,
}

impl NewPost {
    pub fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new().text("content", self.content);
        for tag in self.tags {
            form = form.text("tags", tag);
        }
        for image in self.images {
            form = form.file("images", image);
        }
        form
    }
}

/// 点赞结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeResult {
    pub liked: bool,
    #[serde(default)]
    pub like_count: u32,
}

/// 评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
}

/// 标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}
