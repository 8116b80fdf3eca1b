//! Command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::Map;
use tracing::{info, warn};

use vstudio_client::{
    BearerToken, ProjectsApi, ProjectsClient, RuntimeValues, StudioConfig, YouTubeClient,
};
use vstudio_core::{
    AuthCallback, ConnectionPanel, DetailsChange, DraftUpdate, EditorOp, EditorSession,
    GenerateTarget, Outcome, ProjectListing, PublishMode, PublishOutcome, PublishPanel, Route,
    ScheduleForm, StatusFilter, Tab,
};
use vstudio_models::PrivacyStatus;

use crate::cli::{parse_assignment, Cli, Commands, TargetArg, YoutubeAction};
use crate::render;

/// Optional bearer token attached to every request.
const API_TOKEN_KEY: &str = "STUDIO_API_TOKEN";

const NEW_PROJECT_ARG: &str = "new";

struct AppContext {
    config: StudioConfig,
    token: Option<String>,
}

impl AppContext {
    fn load(runtime_config: Option<&Path>) -> Result<Self> {
        let runtime = match runtime_config {
            Some(path) => RuntimeValues::load(path)
                .with_context(|| format!("failed to read runtime config {}", path.display()))?,
            None => RuntimeValues::empty(),
        };
        let config = StudioConfig::from_env(&runtime).context("invalid configuration")?;
        info!(
            api = %config.api_base_url,
            youtube = %config.youtube_api_base_url,
            "Resolved API endpoints"
        );
        let token = std::env::var(API_TOKEN_KEY).ok().filter(|t| !t.is_empty());
        Ok(Self { config, token })
    }

    fn projects(&self) -> Result<Arc<ProjectsClient>> {
        let mut client = ProjectsClient::new(&self.config)?;
        if let Some(token) = &self.token {
            client = client.with_interceptor(Arc::new(BearerToken::new(token.clone())));
        }
        Ok(Arc::new(client))
    }

    fn youtube(&self) -> Result<Arc<YouTubeClient>> {
        let mut client = YouTubeClient::new(&self.config)?;
        if let Some(token) = &self.token {
            client = client.with_interceptor(Arc::new(BearerToken::new(token.clone())));
        }
        Ok(Arc::new(client))
    }
}

/// Print a confirmation, or turn a failure into the command error.
fn report(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Done(message) => {
            println!("{}", message);
            Ok(())
        }
        Outcome::Skipped(reason) => {
            eprintln!("Nothing to do: {}", reason);
            Ok(())
        }
        Outcome::Failed(message) => bail!(message),
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    // Static pages need no configuration
    match &cli.command {
        Commands::Settings => {
            print!("{}", render::settings());
            return Ok(());
        }
        Commands::Pro => {
            print!("{}", render::pro_plan());
            return Ok(());
        }
        _ => {}
    }

    let ctx = AppContext::load(cli.runtime_config.as_deref())?;

    match cli.command {
        Commands::Projects { status, search } => list_projects(&ctx, &status, &search).await,
        Commands::Show { id, tab } => show_project(&ctx, &id, &tab).await,
        Commands::New {
            title,
            description,
            language,
            use_case,
        } => new_project(&ctx, title, description, language, use_case).await,
        Commands::Edit { id, set } => edit_project(&ctx, &id, &set).await,
        Commands::Delete { id, yes } => delete_project(&ctx, &id, yes).await,
        Commands::Generate {
            id,
            target,
            scene,
            save,
        } => generate(&ctx, &id, target, scene, save).await,
        Commands::Youtube { action } => youtube(&ctx, action).await,
        Commands::Publish {
            id,
            at,
            premiere,
            privacy,
        } => publish(&ctx, &id, at, premiere, privacy).await,
        Commands::Schedule {
            id,
            at,
            premiere,
            privacy,
        } => schedule(&ctx, &id, at, premiere, privacy).await,
        Commands::Thumbnail { id } => {
            let panel = publish_panel(&ctx, &id).await?;
            report(panel.update_thumbnail().await)
        }
        Commands::Metadata {
            id,
            title,
            description,
            tags,
        } => {
            let panel = publish_panel(&ctx, &id).await?;
            report(panel.update_metadata(&title, &description, &tags).await)
        }
        Commands::Open { route } => open_route(&ctx, &route).await,
        Commands::Settings | Commands::Pro => Ok(()),
    }
}

async fn list_projects(ctx: &AppContext, status: &str, search: &str) -> Result<()> {
    let listing = ProjectListing::new(ctx.projects()?);
    if let Err(e) = listing.refresh().await {
        // The listing keeps whatever it had, which here is nothing
        warn!(error = %e, "Could not load projects");
    }
    let filter: StatusFilter = status.parse().unwrap_or_default();
    listing.set_status_filter(filter);
    listing.set_query(search);
    print!("{}", render::cards(&listing.cards()));
    Ok(())
}

async fn open_session(
    ctx: &AppContext,
    id: &str,
) -> Result<EditorSession<Arc<ProjectsClient>>> {
    let api = ctx.projects()?;
    if id == NEW_PROJECT_ARG {
        return Ok(EditorSession::new_project(api));
    }
    EditorSession::open(api, id)
        .await
        .with_context(|| format!("failed to load project {}", id))
}

fn print_session<A: ProjectsApi>(session: &EditorSession<A>) {
    let ops = [
        EditorOp::Save,
        EditorOp::Generate(GenerateTarget::Script),
        EditorOp::Generate(GenerateTarget::Audio),
        EditorOp::Generate(GenerateTarget::Images),
        EditorOp::Generate(GenerateTarget::Video),
        EditorOp::Description,
    ];
    let controls: Vec<_> = ops
        .iter()
        .map(|op| (op.name(), session.availability(*op)))
        .collect();
    let errors: Vec<_> = session
        .errors()
        .into_iter()
        .map(|(op, message)| (op.name().to_string(), message))
        .collect();
    print!(
        "{}",
        render::editor(&session.header(), &controls, &errors, &session.preview())
    );
}

async fn show_project(ctx: &AppContext, id: &str, tab: &str) -> Result<()> {
    let tab: Tab = tab.parse().map_err(anyhow::Error::msg)?;
    let session = open_session(ctx, id).await?;
    session.set_active_tab(tab);
    print_session(&session);
    Ok(())
}

async fn new_project(
    ctx: &AppContext,
    title: Option<String>,
    description: Option<String>,
    language: Option<String>,
    use_case: Option<String>,
) -> Result<()> {
    let session = EditorSession::new_project(ctx.projects()?);
    let changes = [
        title.map(DetailsChange::Title),
        description.map(DetailsChange::Description),
        language.map(DetailsChange::Language),
        use_case.map(DetailsChange::UseCase),
    ];
    for change in changes.into_iter().flatten() {
        session.apply(DraftUpdate::Details(change))?;
    }
    report(session.save().await)?;
    if let Some(id) = session.reference().id() {
        println!("{}", id);
    }
    Ok(())
}

async fn edit_project(ctx: &AppContext, id: &str, assignments: &[String]) -> Result<()> {
    let mut partial = Map::new();
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        partial.insert(key, value);
    }
    let session = open_session(ctx, id).await?;
    session
        .apply_change(partial)
        .context("the new values do not fit the project")?;
    report(session.save().await)
}

async fn delete_project(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete {} without --yes", id);
    }
    let listing = ProjectListing::new(ctx.projects()?);
    report(listing.delete(id).await)
}

async fn generate(
    ctx: &AppContext,
    id: &str,
    target: TargetArg,
    scene: Option<usize>,
    save: bool,
) -> Result<()> {
    let session = open_session(ctx, id).await?;

    let target = match target {
        TargetArg::Script => Some(GenerateTarget::Script),
        TargetArg::Audio => Some(GenerateTarget::Audio),
        TargetArg::Images => Some(GenerateTarget::Images),
        TargetArg::Video => Some(GenerateTarget::Video),
        TargetArg::Scene => match scene {
            Some(n) if n >= 1 => Some(GenerateTarget::SceneImage(n - 1)),
            _ => bail!("`scene` needs --scene N (1-based)"),
        },
        TargetArg::Description => None,
    };
    let outcome = match target {
        Some(target) => session.generate(target).await,
        None => session.generate_description().await,
    };

    let succeeded = outcome.is_done();
    report(outcome)?;
    if save && succeeded {
        report(session.save().await)?;
        if let Some(id) = session.reference().id() {
            println!("{}", id);
        }
    }
    Ok(())
}

async fn youtube(ctx: &AppContext, action: YoutubeAction) -> Result<()> {
    let panel = ConnectionPanel::new(ctx.youtube()?);
    match action {
        YoutubeAction::Status => {
            let connected = panel.check_status().await;
            if let Some(error) = panel.error() {
                bail!(error);
            }
            if connected {
                println!("Connected");
                if let Some(channel) = panel.channel() {
                    print!("{}", render::channel(&channel));
                }
            } else {
                println!("Not connected");
            }
            Ok(())
        }
        YoutubeAction::Connect => {
            let url = panel.connect().await.map_err(anyhow::Error::msg)?;
            println!("Open this URL to connect your YouTube account:\n{}", url);
            Ok(())
        }
        YoutubeAction::Disconnect => report(panel.disconnect().await),
        YoutubeAction::Callback { query } => match panel.handle_callback(&query).await {
            AuthCallback::Success if panel.is_authenticated() => {
                println!("YouTube account connected");
                Ok(())
            }
            AuthCallback::Absent => bail!("no auth result in {:?}", query),
            _ => bail!(panel
                .error()
                .unwrap_or_else(|| "YouTube account is not connected".to_string())),
        },
    }
}

async fn publish_panel(ctx: &AppContext, id: &str) -> Result<PublishPanel<Arc<YouTubeClient>>> {
    let project = ctx
        .projects()?
        .get(id)
        .await
        .with_context(|| format!("failed to load project {}", id))?;
    let panel = PublishPanel::new(ctx.youtube()?, project);
    panel.check_auth().await;
    Ok(panel)
}

async fn publish(
    ctx: &AppContext,
    id: &str,
    at: Option<String>,
    premiere: bool,
    privacy: PrivacyStatus,
) -> Result<()> {
    let panel = publish_panel(ctx, id).await?;
    if let Some(warning) = panel.readiness().warning() {
        bail!(warning);
    }
    if let Some(publish_at) = at {
        panel.set_mode(PublishMode::Scheduled(ScheduleForm {
            publish_at,
            is_premiere: premiere,
            final_privacy_status: privacy,
        }));
    }

    let outcome = panel.publish().await;
    match &outcome {
        PublishOutcome::Uploaded(info) | PublishOutcome::Scheduled(info) => {
            println!("{}", outcome.message());
            print!("{}", render::upload(info));
            Ok(())
        }
        PublishOutcome::UploadedNotScheduled { info, message } => {
            print!("{}", render::upload(info));
            bail!(message.clone())
        }
        PublishOutcome::Skipped(reason) => {
            eprintln!("Nothing to do: {}", reason);
            Ok(())
        }
        PublishOutcome::Failed(message) => bail!(message.clone()),
    }
}

async fn schedule(
    ctx: &AppContext,
    id: &str,
    publish_at: String,
    premiere: bool,
    privacy: PrivacyStatus,
) -> Result<()> {
    let panel = publish_panel(ctx, id).await?;
    let form = ScheduleForm {
        publish_at,
        is_premiere: premiere,
        final_privacy_status: privacy,
    };
    report(panel.schedule(&form).await)?;
    if let Some(info) = panel.upload_info() {
        print!("{}", render::upload(&info));
    }
    Ok(())
}

async fn open_route(ctx: &AppContext, raw: &str) -> Result<()> {
    let route = Route::parse(raw);
    print!("{}", render::sidebar(&route.path()));
    println!();
    match route {
        Route::Projects => list_projects(ctx, "all", "").await,
        Route::NewProject => {
            let session = EditorSession::new_project(ctx.projects()?);
            print_session(&session);
            Ok(())
        }
        Route::Editor(id) => show_project(ctx, &id, Tab::default().id()).await,
        Route::Settings => {
            print!("{}", render::settings());
            Ok(())
        }
        Route::ProPlan => {
            print!("{}", render::pro_plan());
            Ok(())
        }
        Route::NotFound(path) => bail!("no page at {}", path),
    }
}
