use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct NewAccountDoc {
    pub first_name: String,
    pub last_name: String,
    /// Email address; stored lowercased.
    pub username: String,
    /// 8 to 12 characters.
    pub password: String,
}

#[derive(ToSchema)]
pub struct AccountUpdateDoc { pub first_name: String, pub last_name: String, pub password: String }

#[derive(ToSchema)]
pub struct AccountDoc {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub account_created: String,
    pub account_updated: String,
}

#[derive(ToSchema)]
pub struct ProductDoc {
    pub name: String,
    pub description: String,
    pub sku: String,
    pub manufacturer: String,
    /// Integer in 0..=100.
    pub quantity: i32,
}

#[derive(ToSchema)]
pub struct ProductPatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub manufacturer: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(ToSchema)]
pub struct ProductRecordDoc {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub manufacturer: String,
    pub quantity: i32,
    pub date_added: String,
    pub date_last_updated: String,
    pub owner_user_id: i32,
}

#[derive(ToSchema)]
pub struct ImageUploadDoc {
    /// JPEG or PNG payload.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(ToSchema)]
pub struct ImageDoc {
    pub image_id: i32,
    pub product_id: i32,
    pub file_name: String,
    pub date_created: String,
    pub s3_bucket_path: String,
}

struct BasicAuth;

impl Modify for BasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme("basic", SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::check,
        crate::routes::accounts::create,
        crate::routes::accounts::get,
        crate::routes::accounts::update,
        crate::routes::products::create,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::replace,
        crate::routes::products::patch,
        crate::routes::products::delete,
        crate::routes::images::create,
        crate::routes::images::list,
        crate::routes::images::get,
        crate::routes::images::delete,
    ),
    components(
        schemas(
            NewAccountDoc,
            AccountUpdateDoc,
            AccountDoc,
            ProductDoc,
            ProductPatchDoc,
            ProductRecordDoc,
            ImageUploadDoc,
            ImageDoc,
        )
    ),
    modifiers(&BasicAuth),
    tags(
        (name = "health"),
        (name = "account"),
        (name = "product"),
        (name = "image")
    )
)]
pub struct ApiDoc;
