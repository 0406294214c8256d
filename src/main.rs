use std::{path::PathBuf, process::ExitCode, time::Duration};

use pixiv_ugoira::{download_ugoira_zip, util::parse_illust_id, ApiError, Client, Config, Format};

const HELP: &str = "\
pixiv-ugoira: download a pixiv ugoira as an animated image

USAGE:
  pixiv-ugoira [OPTIONS] <ID | URL>

OPTIONS:
  -f, --format <apng|gif|zip>  Output format [default: gif]
  -o, --output <PATH>          Destination [default: <id>.<ext>]
      --user-agent <UA>        User-Agent sent to pixiv
      --referer <URL>          Referer sent to pixiv [default: https://www.pixiv.net/]
      --timeout <SECS>         HTTP timeout, 0 disables it [default: 30]
      --base-url <URL>         Artwork page base url
      --max-size <BYTES>       Largest archive accepted [default: 67108864]
  -h, --help                   Print help
";

struct Args {
    id: u64,
    format: Format,
    output: Option<PathBuf>,
    config: Config,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let format = pargs
        .opt_value_from_fn(["-f", "--format"], |s| {
            s.parse::<Format>()
                .map_err(|_| format!("unknown format {s:?}"))
        })
        .map_err(|e| e.to_string())?
        .unwrap_or(Format::Gif);
    let output: Option<PathBuf> = pargs
        .opt_value_from_os_str(["-o", "--output"], |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })
        .map_err(|e| e.to_string())?;

    let mut config = Config::default();
    if let Some(user_agent) = pargs
        .opt_value_from_str::<_, String>("--user-agent")
        .map_err(|e| e.to_string())?
    {
        config = config.with_user_agent(user_agent);
    }
    if let Some(referer) = pargs
        .opt_value_from_str::<_, String>("--referer")
        .map_err(|e| e.to_string())?
    {
        config = config.with_referer(referer);
    }
    if let Some(timeout) = pargs
        .opt_value_from_str::<_, u64>("--timeout")
        .map_err(|e| e.to_string())?
    {
        config = config.with_timeout((timeout > 0).then(|| Duration::from_secs(timeout)));
    }
    if let Some(base_url) = pargs
        .opt_value_from_str::<_, String>("--base-url")
        .map_err(|e| e.to_string())?
    {
        config = config.with_page_base_url(base_url);
    }
    if let Some(max_size) = pargs
        .opt_value_from_str::<_, u64>("--max-size")
        .map_err(|e| e.to_string())?
    {
        config = config.with_max_archive_size(max_size);
    }

    let input: String = pargs.free_from_str().map_err(|e| e.to_string())?;
    let id = parse_illust_id(&input).ok_or_else(|| format!("not a pixiv id or link: {input}"))?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        return Err(format!("unexpected arguments: {remaining:?}"));
    }

    Ok(Some(Args {
        id,
        format,
        output,
        config,
    }))
}

fn run(args: Args) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    let client = Client::new(args.config);

    let (data, frames) = match download_ugoira_zip(&client, args.id) {
        Ok(download) => download,
        Err(ApiError::NotUgoira { id, .. }) => {
            return Err(format!("{id} is not a ugoira").into());
        }
        Err(err) => return Err(err.into()),
    };

    let destination = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}", args.id, args.format.extension())));
    args.format.write(&destination, &data, &frames)?;

    Ok(destination)
}

fn main() -> ExitCode {
    let env = env_logger::Env::new().default_filter_or("info");
    env_logger::init_from_env(env);

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    let id = args.id;
    let format = args.format;
    match run(args) {
        Ok(destination) => {
            log::info!("[Pixiv: {id}] Saved {format} to {}", destination.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("[Pixiv: {id}] {err}");
            ExitCode::FAILURE
        }
    }
}
