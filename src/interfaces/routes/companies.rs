use actix_web::web;

use crate::handlers::companies;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/companies")
            .service(
                web::resource("")
                    .route(web::get().to(companies::search_companies))
                    .route(web::post().to(companies::create_company))
            )
            .service(
                web::resource("/{company_id}")
                    .route(web::get().to(companies::get_company))
            )
    );
}
