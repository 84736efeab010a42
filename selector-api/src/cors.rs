use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};

/// Lets browser-hosted graph editors call the selector directly.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        res.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));

        let req_headers = req
            .headers()
            .get_one("Access-Control-Request-Headers")
            .unwrap_or("Accept, Content-Type");
        res.set_header(Header::new("Access-Control-Allow-Headers", req_headers.to_string()));
        res.set_header(Header::new("Access-Control-Max-Age", "86400"));
    }
}
