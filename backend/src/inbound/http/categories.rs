//! Category API handlers.
//!
//! ```text
//! POST   /api/v1/category       {"name":"groceries"}
//! DELETE /api/v1/category/{id}
//! POST   /api/v1/category/all   {"page":1,"page_size":20}
//! ```
//!
//! Handlers only validate the request shape and delegate to the category
//! ports.

use actix_web::{HttpResponse, delete, post, web};
use pagination::{DEFAULT_PAGE_SIZE, FIRST_PAGE, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, CategoryName, Error, NewCategory};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request_error, parse_uuid};

/// Create request body for `POST /api/v1/category`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CategoryBody {
    #[schema(example = "groceries")]
    pub name: String,
}

impl From<CategoryBody> for NewCategory {
    fn from(value: CategoryBody) -> Self {
        Self {
            name: CategoryName::from(value.name),
        }
    }
}

/// Pagination body for `POST /api/v1/category/all`.
///
/// Both fields are optional and fall back to the first page of twenty.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ListCategoriesBody {
    #[schema(example = 1, minimum = 1)]
    pub page: Option<u32>,
    #[serde(alias = "pageSize")]
    #[schema(example = 20, minimum = 1, maximum = 100)]
    pub page_size: Option<u32>,
}

impl ListCategoriesBody {
    fn page_request(&self) -> Result<PageRequest, Error> {
        PageRequest::new(
            self.page.unwrap_or(FIRST_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map_err(page_request_error)
    }
}

/// Single category in a listing.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    #[schema(example = "groceries")]
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        Self {
            id: value.id(),
            name: value.name().to_string(),
        }
    }
}

/// Listing payload for `POST /api/v1/category/all`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryResponse>,
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/api/v1/category",
    request_body = CategoryBody,
    responses(
        (status = 200, description = "Category created"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/category")]
pub async fn create_category(
    state: web::Data<HttpState>,
    payload: web::Json<CategoryBody>,
) -> ApiResult<HttpResponse> {
    state
        .categories
        .create_category(NewCategory::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Delete a category by identifier.
#[utoipa::path(
    delete,
    path = "/api/v1/category/{id}",
    params(("id" = Uuid, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/category/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("id"))?;
    state.categories.delete_category(id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// List one page of categories.
#[utoipa::path(
    post,
    path = "/api/v1/category/all",
    request_body = ListCategoriesBody,
    responses(
        (status = 200, description = "Categories", body = CategoriesResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[post("/category/all")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    payload: web::Json<ListCategoriesBody>,
) -> ApiResult<web::Json<CategoriesResponse>> {
    let page = payload.page_request()?;
    let categories = state.categories_query.list_categories(page).await?;
    Ok(web::Json(CategoriesResponse {
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    }))
}
