use variant_rs::relationship_resolver::*;

const EXIT_RESOLUTION_FAILED: i32 = 1;
const EXIT_BAD_INPUT: i32 = 2;

fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",          "Show help");
		opts.optflag( "v", "verbose",       "Increased vebosity");
		opts.optopt(  "c", "catalog",       "Catalog document, or a bincode snapshot ending in .bin", "FILE");
		opts.optopt(  "m", "manifest",      "Manifest document", "FILE");
		opts.optopt(  "p", "platform",      "Resolve for this platform instead of the host", "TAG");
		opts.optopt(  "",  "attempt-limit", "Give up after this many tentative assignments", "N");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { eprintln!("Unable to parse options: {}", e); std::process::exit(EXIT_BAD_INPUT) }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: variant-rs-terminal resolve --catalog FILE --manifest FILE [options]"));
			return;
		}

		parsed_options
	};

	if parsed_options.opt_present("v") {
		env_logger::Builder::from_default_env().filter_level(log::LevelFilter::Debug).init();
	} else {
		env_logger::init();
	}

	let options = variant_rs::ResolverOptions::load_from_disk().unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		variant_rs::ResolverOptions::default()
	});

	let code = match parsed_options.free.first().map(String::as_str) {
		Some("resolve") => match resolve(&parsed_options, options) {
			Ok(()) => 0,
			Err(Error::Resolution(failure)) => {
				log::error!("{}", failure);
				eprintln!("{}", failure);
				EXIT_RESOLUTION_FAILED
			},
			Err(e) => {
				log::error!("{}", e);
				eprintln!("{}", e);
				EXIT_BAD_INPUT
			},
		},
		Some(other) => {
			eprintln!("Unknown command \"{}\"", other);
			EXIT_BAD_INPUT
		},
		None => {
			eprintln!("{}", opts.usage("Usage: variant-rs-terminal resolve --catalog FILE --manifest FILE [options]"));
			EXIT_BAD_INPUT
		},
	};
	std::process::exit(code);
}

fn resolve(parsed_options: &getopts::Matches, mut options: variant_rs::ResolverOptions) -> Result<(), Error> {
	let catalog_path = parsed_options.opt_str("catalog").ok_or(Error::MissingArgument("--catalog"))?;
	let manifest_path = parsed_options.opt_str("manifest").ok_or(Error::MissingArgument("--manifest"))?;

	if let Some(limit) = parsed_options.opt_str("attempt-limit") {
		let limit = limit.parse::<usize>().map_err(|_| Error::InvalidArgument("--attempt-limit", limit.clone()))?;
		if !options.set_attempt_limit(limit) {
			return Err(Error::InvalidArgument("--attempt-limit", limit.to_string()));
		}
	}

	let catalog = if catalog_path.ends_with(".bin") {
		variant_rs::MemoryCatalog::load_snapshot(&catalog_path)?
	} else {
		variant_rs::MemoryCatalog::load_from_json_file(&catalog_path)?
	};
	let manifest = variant_rs::Manifest::load_from_json_file(&manifest_path)?;

	let mut builder = ResolverBuilder::new(&catalog)
		.manifest(&manifest)
		.options(options);
	if let Some(tag) = parsed_options.opt_str("platform") {
		builder = builder.platform(tag.parse::<variant_rs::PlatformTag>()?);
	}

	let mut resolver = builder.build();
	log::trace!("Resolving for platform {}", resolver.platform());
	match resolver.attempt_resolve() {
		ResolverStatus::Complete => {},
		ResolverStatus::Failed(failure) => return Err(Error::Resolution(failure)),
	}
	let platform = resolver.platform().clone();
	let finalized = resolver.finalize().map_err(|_| Error::Incomplete)?;

	println!("Resolved for platform {}:", platform);
	for node in finalized.graph().install_order() {
		let marker = if finalized.graph().requirements_on(&node.name).iter().any(|e| matches!(e, EdgeData::Required { force_generic: true, .. })) {
			" [forced generic]"
		} else {
			""
		};
		println!("\t{} {} ({}){}", node.name, node.variant.version, node.variant.platform, marker);
	}

	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("variant-rs error: {0}")]
	VariantRs(#[from] variant_rs::Error),
	#[error("{0}")]
	Resolution(ResolutionFailure),
	#[error("Missing argument {0}")]
	MissingArgument(&'static str),
	#[error("Invalid value \"{1}\" for {0}")]
	InvalidArgument(&'static str, String),
	#[error("Resolver did not complete")]
	Incomplete,
}
