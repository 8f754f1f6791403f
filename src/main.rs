use clap::Parser;
use tagtree::application::build_site::sorted_cloud;
use tagtree::application::{init, BuildOptions, BuildService, ListTagsService, RelatedService};
use tagtree::cli::{format_build_report, format_related_list, format_tag_list, Cli, Commands};
use tagtree::error::TagtreeError;
use tagtree::infrastructure::SiteRepository;
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    init_logging(&cli);

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), TagtreeError> {
    match cli.command {
        Commands::Init { path } => {
            let config_path = init::init(&path)?;
            println!("Initialized tagtree site: {}", config_path.display());
            Ok(())
        }
        Commands::Build {
            all_tags,
            rewrite,
            no_related,
        } => {
            let repo = SiteRepository::discover(cli.root)?;
            let report = BuildService::new(repo).execute(BuildOptions {
                all_tags,
                rewrite,
                skip_related: no_related,
            })?;
            print!("{}", format_build_report(&report));
            Ok(())
        }
        Commands::Cloud => {
            let repo = SiteRepository::discover(cli.root)?;
            let config = repo.load_config()?;
            let tree = repo.load_tree(&config)?;
            let cloud = sorted_cloud(&tree, &config);
            println!("{}", config.renderer().cloud_html(&cloud));
            Ok(())
        }
        Commands::Tags => {
            let repo = SiteRepository::discover(cli.root)?;
            let tags = ListTagsService::new(repo).execute()?;
            let output = format_tag_list(&tags);
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
            Ok(())
        }
        Commands::Related { file } => {
            let repo = SiteRepository::discover(cli.root)?;
            let related = RelatedService::new(repo).execute(&file)?;
            let output = format_related_list(&related);
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
            Ok(())
        }
    }
}
