use gacha_arena::rocket_initialize;

#[rocket::main]
async fn main() {
    if let Err(error) = rocket_initialize().launch().await {
        eprintln!("Failed to launch rocket: {error}");
        std::process::exit(1);
    }
}
