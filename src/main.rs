#[cfg(feature = "ssr")]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    use actix_files::Files;
    use actix_web::*;
    use leptos::logging::log;
    use leptos::*;
    use leptos_actix::{generate_route_list, LeptosRoutes};
    use std::io;
    use std::net::SocketAddr;
    use surveyware::api;
    use surveyware::app::*;
    use surveyware::config::Config;
    use surveyware::db::Database;
    use surveyware::service::ReviewService;
    use surveyware::uploads::{UploadStore, PUBLIC_PREFIX};

    let config = Config::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Initialize the database
    let db = Database::new(config.database_path()).map_err(io::Error::other)?;
    db.create_schema().await.map_err(io::Error::other)?;
    log!("Schema created successfully!");

    let uploads = UploadStore::new(&config.uploads_dir);
    uploads.ensure_dir()?;

    // Shared by every worker; clones of the store handle share one connection
    let service = web::Data::new(ReviewService::new(db.clone(), uploads));

    // Load configuration
    let conf = get_configuration(None)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;
    let addr = SocketAddr::new(conf.leptos_options.site_addr.ip(), config.port);
    let uploads_dir = config.uploads_dir.clone();

    // Generate the list of routes in your Leptos App
    let routes = generate_route_list(App);
    log!("listening on http://{}", &addr);

    HttpServer::new(move || {
        let leptos_options = &conf.leptos_options;
        let site_root = &leptos_options.site_root;

        App::new()
            .app_data(service.clone())
            // Review API
            .service(web::scope("/api").configure(api::configure))
            // Uploaded images
            .service(Files::new(PUBLIC_PREFIX, uploads_dir.clone()))
            // Serve JS/WASM/CSS from `pkg`
            .service(Files::new("/pkg", format!("{site_root}/pkg")))
            // Register Leptos routes
            .leptos_routes(leptos_options.to_owned(), routes.to_owned(), App)
            .app_data(web::Data::new(leptos_options.to_owned()))
    })
    .bind(&addr)?
    .run()
    .await?;

    log!("Server stopped, closing database");
    db.close().await.map_err(io::Error::other)
}

#[cfg(not(any(feature = "ssr", feature = "csr")))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}

#[cfg(all(not(feature = "ssr"), feature = "csr"))]
pub fn main() {
    // a client-side main function is required for using `trunk serve`
    // to run: `trunk serve --open --features csr`
    use surveyware::app::*;

    console_error_panic_hook::set_once();

    leptos::mount_to_body(App);
}
