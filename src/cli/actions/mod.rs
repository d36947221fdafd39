pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        public_key: String,
        base_group: String,
        admin_group: String,
    },
}
