use utoipa::openapi::{
    security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Components, InfoBuilder, OpenApi, OpenApiBuilder,
};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "bearer_auth";

/// Merge per-module documents into one and register the bearer scheme.
pub fn assemble(title: &str, version: &str, parts: impl IntoIterator<Item = OpenApi>) -> OpenApi {
    let mut doc = OpenApiBuilder::new()
        .info(InfoBuilder::new().title(title).version(version).build())
        .build();
    for part in parts {
        doc.merge(part);
    }
    doc.components
        .get_or_insert_with(Components::default)
        .add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    doc
}
