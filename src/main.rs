use std::process::exit;

#[tokio::main]
async fn main() {
    match oscpod::run().await {
        Ok(code) => exit(code),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            exit(1);
        }
    }
}
