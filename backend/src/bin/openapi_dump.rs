//! Print the OpenAPI document as JSON for external tooling.

use utoipa::OpenApi;

use larder::ApiDoc;

#[expect(clippy::print_stdout, reason = "the document goes to stdout for piping")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let json = ApiDoc::openapi().to_pretty_json()?;
    println!("{json}");
    Ok(())
}
