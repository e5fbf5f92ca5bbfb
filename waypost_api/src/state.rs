use waypost_routing::router::Router;

pub struct AppState {
    pub router: Router,
}
