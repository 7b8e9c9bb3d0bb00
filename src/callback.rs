use std::io::Read;
use std::net::SocketAddr;

use log::{debug, error, info, warn};
use tiny_http::{Header, Method, Request, Response};
use tokio::sync::oneshot;

use crate::error::{Error, Result};

const AUTH_FINISH_PREFIX: &str = "/authfinish?code=";

const GET_PAGE: &str = "<html><body><h1>hi!</h1>\
    <script>alert('You can now close this page')</script></body></html>";
const POST_PAGE: &str = "<html><body><h1>POST!</h1></body></html>";
const FAILURE_PAGE: &str = "<html><body><h1>Export failed</h1>\
    <p>See the terminal for details.</p></body></html>";

/// Receives the authorization code caught by the listener and does whatever
/// the code is for. Runs on the listener thread and blocks it.
pub trait CodeHandler {
    type Output;

    fn handle_authorization_code(&self, code: &str) -> Result<Self::Output>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    AuthFinish(String),
    Page,
    Head,
    Post,
}

impl Route {
    pub fn parse(method: &Method, url: &str) -> Route {
        match method {
            Method::Head => Route::Head,
            Method::Post => Route::Post,
            _ => match url.strip_prefix(AUTH_FINISH_PREFIX) {
                Some(rest) => {
                    let code = rest.split('&').next().unwrap_or_default();
                    if code.is_empty() {
                        Route::Page
                    } else {
                        Route::AuthFinish(code.to_string())
                    }
                }
                None => Route::Page,
            },
        }
    }
}

pub struct CallbackServer {
    server: tiny_http::Server,
}

impl CallbackServer {
    pub fn bind(port: u16) -> Result<CallbackServer> {
        let server = tiny_http::Server::http(("127.0.0.1", port))
            .map_err(|source| Error::Bind { port, source })?;
        Ok(CallbackServer { server })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serves requests one at a time until the process exits. The outcome of
    /// the first `/authfinish` request is sent on `done`.
    pub fn serve<H>(self, handler: H, done: oneshot::Sender<Result<H::Output>>)
    where
        H: CodeHandler,
    {
        if let Some(addr) = self.local_addr() {
            info!("Listening for the Deezer redirect on http://{addr}");
        }

        let mut done = Some(done);
        for request in self.server.incoming_requests() {
            let route = Route::parse(request.method(), request.url());
            debug!("{} {}", request.method(), route_label(&route));

            match route {
                Route::AuthFinish(code) => {
                    info!("Found authorization code");
                    debug!("authorization code: {code}");

                    let outcome = handler.handle_authorization_code(&code);
                    let page = match &outcome {
                        Ok(_) => GET_PAGE,
                        Err(e) => {
                            error!("export failed: {e}");
                            FAILURE_PAGE
                        }
                    };
                    respond(request, html(Response::from_string(page)));

                    match done.take() {
                        Some(done) => {
                            // The receiver is gone only if the main task already stopped.
                            let _ = done.send(outcome);
                        }
                        None => debug!("completion already reported"),
                    }
                }
                Route::Page => respond(request, html(Response::from_string(GET_PAGE))),
                Route::Head => respond(request, html(Response::empty(200))),
                Route::Post => respond(request, html(Response::from_string(POST_PAGE))),
            }
        }
    }
}

fn route_label(route: &Route) -> &'static str {
    match route {
        Route::AuthFinish(_) => "/authfinish",
        Route::Page => "page",
        Route::Head => "head",
        Route::Post => "post",
    }
}

fn html<R: Read>(response: Response<R>) -> Response<R> {
    match Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

fn respond<R: Read>(request: Request, response: Response<R>) {
    if let Err(e) = request.respond(response) {
        warn!("Error responding to callback request: {e}");
    }
}
