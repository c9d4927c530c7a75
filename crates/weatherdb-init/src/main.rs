use tracing::{error, info, warn};
use weatherdb_admin::MongoAdmin;
use weatherdb_init::{EnvMode, InitConfig, InitError, Plan, bootstrap};

const PRINT_PLAN: &str = "--print-plan";
const REQUIRE_ENV: &str = "--require-env";

fn main() {
    // Logs go to stderr so --print-plan output stays clean on stdout.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    for arg in &args {
        if arg != PRINT_PLAN && arg != REQUIRE_ENV {
            warn!(arg = %arg, "ignoring unknown argument");
        }
    }
    let print_plan = args.iter().any(|a| a == PRINT_PLAN);
    let mode = if args.iter().any(|a| a == REQUIRE_ENV) {
        EnvMode::Required
    } else {
        EnvMode::Defaults
    };

    if let Err(e) = run(mode, print_plan) {
        error!(error = %e, "bootstrap failed");
        std::process::exit(1);
    }
}

fn run(mode: EnvMode, print_plan: bool) -> Result<(), InitError> {
    let config = InitConfig::from_env(mode)?;
    let plan = Plan::new(config.credential.clone(), config.collection()?)?;

    if print_plan {
        println!("{}", serde_json::to_string_pretty(&plan.render())?);
        return Ok(());
    }

    info!(
        database = plan.database(),
        user = plan.credential().username(),
        collection = %plan.collection().name,
        custom_schema = config.schema_file.is_some(),
        "starting bootstrap"
    );

    let mut admin = MongoAdmin::connect(&config.uri).map_err(InitError::Connect)?;
    bootstrap(&mut admin, &plan)
}
