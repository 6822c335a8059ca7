use anyhow::Context;
use scrape_client::{
    load_settings, ApiClient, ApiError, HealthMonitor, HealthService, JobListQuery, JobService,
    MonitorConfig, ResultsOptions, ResultsService, ScrapeRequest, Settings,
};
use serde::Serialize;

use crate::args::{CliArgs, Command, JobsArgs, SubmitArgs};

pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let settings = settings_for(&args)?;
    let client = ApiClient::new(settings.client_config()).context("invalid client configuration")?;
    log::debug!("using {}", client.base_url());

    match args.command {
        Command::Health { versioned } => health(client, versioned).await,
        Command::Watch {
            interval_ms,
            versioned,
        } => watch(client, &settings, interval_ms, versioned).await,
        Command::Jobs(jobs) => list_jobs(client, jobs).await,
        Command::Job { id } => {
            let job = JobService::new(client).get_job(&id).await.map_err(report)?;
            print_json(&job)
        }
        Command::Submit(submit) => submit_job(client, submit).await,
        Command::Cancel { id } => {
            JobService::new(client).cancel_job(&id).await.map_err(report)?;
            println!("cancelled {id}");
            Ok(())
        }
        Command::Results {
            id,
            html,
            screenshot,
        } => {
            let options = ResultsOptions {
                include_html: html,
                include_screenshot: screenshot,
            };
            let result = ResultsService::new(client)
                .get_results(&id, options)
                .await
                .map_err(report)?;
            print_json(&result)
        }
    }
}

fn settings_for(args: &CliArgs) -> anyhow::Result<Settings> {
    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(url) = &args.base_url {
        settings.base_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        settings.timeout_seconds = timeout;
    }
    Ok(settings)
}

fn health_service(client: ApiClient, versioned: bool) -> HealthService {
    if versioned {
        HealthService::versioned(client)
    } else {
        HealthService::new(client)
    }
}

async fn health(client: ApiClient, versioned: bool) -> anyhow::Result<()> {
    let report = health_service(client, versioned)
        .check()
        .await
        .map_err(report)?;
    print_json(&report)?;
    if !scrape_client::evaluate_health(&report) {
        anyhow::bail!("service is unhealthy");
    }
    Ok(())
}

async fn watch(
    client: ApiClient,
    settings: &Settings,
    interval_ms: Option<u64>,
    versioned: bool,
) -> anyhow::Result<()> {
    let interval = interval_ms
        .map(std::time::Duration::from_millis)
        .unwrap_or_else(|| settings.health.interval());
    let config = MonitorConfig::new(interval)
        .probe_policy(settings.health.probe.clone())
        .on_health_change(|healthy, snapshot| {
            let line = serde_json::json!({ "healthy": healthy, "snapshot": snapshot });
            println!("{line}");
        })
        .on_error(|err| eprintln!("health check failed: {}", err.user_message()));

    let monitor = HealthMonitor::new(health_service(client, versioned));
    monitor.start_monitoring(config);
    log::info!("watching health every {}ms", interval.as_millis());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    monitor.stop_monitoring();
    Ok(())
}

async fn list_jobs(client: ApiClient, args: JobsArgs) -> anyhow::Result<()> {
    let query = JobListQuery {
        status: args.status,
        limit: args.limit,
        offset: args.offset,
        sort_by: args.sort_by,
        sort_order: args.order.map(Into::into),
    };
    let jobs = JobService::new(client).list_jobs(&query).await.map_err(report)?;
    print_json(&jobs)
}

async fn submit_job(client: ApiClient, args: SubmitArgs) -> anyhow::Result<()> {
    let mut request = ScrapeRequest::new(args.url);
    if let Some(selector) = args.wait_for {
        request = request.wait_for(selector);
    }
    if args.javascript {
        request = request.javascript(true);
    }
    if args.screenshot {
        request = request.screenshot(true);
    }
    let job = JobService::new(client)
        .create_job(&request)
        .await
        .map_err(report)?;
    print_json(&job)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(err: ApiError) -> anyhow::Error {
    log::debug!("request failed: {err}");
    anyhow::anyhow!("{} ({err})", err.user_message())
}
