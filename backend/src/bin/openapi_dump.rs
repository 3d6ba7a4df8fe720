//! Print the OpenAPI document as JSON.

use backend::ApiDoc;
use utoipa::OpenApi;

#[allow(clippy::print_stdout)]
fn main() -> Result<(), serde_json::Error> {
    println!("{}", ApiDoc::openapi().to_json()?);
    Ok(())
}
