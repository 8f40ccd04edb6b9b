//! CRUD handlers shared by every resource.
//!
//! ```text
//! GET    /{resource}          paginated list
//! POST   /{resource}          create, 201
//! GET    /{resource}/select   picker options
//! GET    /{resource}/{id}     fetch
//! PUT    /{resource}/{id}     partial update
//! DELETE /{resource}/{id}     delete, 204
//! ```

use actix_web::{HttpResponse, Scope, web};
use pagination::Paginated;

use crate::domain::ResourceService;
use crate::domain::resources::{Resource, SelectOption};
use crate::domain::validation::{IdParam, ListQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::validation::{ValidJson, ValidPath, ValidQuery};

type Service<R> = web::Data<ResourceService<R>>;

/// Mount the six handlers for `R` under `path`.
///
/// `/select` is registered before `/{id}` so it never parses as an id.
#[must_use]
pub fn resource_scope<R: Resource>(path: &str, service: ResourceService<R>) -> Scope {
    web::scope(path)
        .app_data(web::Data::new(service))
        .service(
            web::resource("")
                .route(web::get().to(list::<R>))
                .route(web::post().to(create::<R>)),
        )
        .service(web::resource("/select").route(web::get().to(list_for_select::<R>)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(get_by_id::<R>))
                .route(web::put().to(update::<R>))
                .route(web::delete().to(delete::<R>)),
        )
}

async fn list<R: Resource>(
    service: Service<R>,
    ValidQuery(query): ValidQuery<ListQuery<R::ListFilter>>,
) -> ApiResult<web::Json<Paginated<R::Record>>> {
    Ok(web::Json(service.list(query).await?))
}

async fn list_for_select<R: Resource>(
    service: Service<R>,
    ValidQuery(filter): ValidQuery<R::SelectFilter>,
) -> ApiResult<web::Json<Vec<SelectOption>>> {
    Ok(web::Json(service.list_for_select(filter).await?))
}

async fn get_by_id<R: Resource>(
    service: Service<R>,
    ValidPath(id): ValidPath<IdParam>,
) -> ApiResult<web::Json<R::Record>> {
    Ok(web::Json(service.get_by_id(id.get()).await?))
}

async fn create<R: Resource>(
    service: Service<R>,
    ValidJson(input): ValidJson<R::Create>,
) -> ApiResult<HttpResponse> {
    let record = service.create(input).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Extractors resolve in argument order: an invalid id fails the request
/// without validating the body, so only the `id` issue is reported.
async fn update<R: Resource>(
    service: Service<R>,
    ValidPath(id): ValidPath<IdParam>,
    ValidJson(changes): ValidJson<R::Update>,
) -> ApiResult<web::Json<R::Record>> {
    Ok(web::Json(service.update(id.get(), changes).await?))
}

async fn delete<R: Resource>(
    service: Service<R>,
    ValidPath(id): ValidPath<IdParam>,
) -> ApiResult<HttpResponse> {
    service.delete(id.get()).await?;
    Ok(HttpResponse::NoContent().finish())
}
