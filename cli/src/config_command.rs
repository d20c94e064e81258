use saferoute_common::CliConfigOverrides;
use saferoute_common::Config;
use saferoute_common::ConfigOverrides;
use saferoute_common::create_config_summary_entries;

const EXIT_CODE_INVALID_CONFIG: i32 = 3;

pub fn validate_config(
    cli_overrides: CliConfigOverrides,
    api_base_url: Option<String>,
    should_print: bool,
) {
    let cli_overrides = match cli_overrides.parse_overrides() {
        Ok(overrides) => overrides,
        Err(err) => {
            eprintln!("Error parsing -c overrides: {err}");
            std::process::exit(EXIT_CODE_INVALID_CONFIG);
        }
    };

    let overrides = ConfigOverrides {
        api_base_url,
        ..Default::default()
    };
    match Config::load_with_cli_overrides(cli_overrides, overrides) {
        Ok(config) => {
            if should_print {
                println!("Current config settings:");
                println!("--------------------------------");
                for (key, value) in create_config_summary_entries(&config) {
                    println!("{key}: {value}");
                }
                println!("--------------------------------");
            }
        }
        Err(err) => {
            if should_print {
                eprintln!("Config validation error: {err}");
            }
            std::process::exit(EXIT_CODE_INVALID_CONFIG);
        }
    }
}
