use mailing_list::startup::Application;
use mailing_list::{configuration::get_configuration, telemetry::*};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("mailing-list".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    Application::build(configuration)
        .await?
        .run_until_stopped()
        .await?;
    Ok(())
}
