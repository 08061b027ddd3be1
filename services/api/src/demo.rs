use crate::infra::build_store;
use clap::Args;
use hireboard::error::{AppError, ServiceError};
use hireboard::ids::PostId;
use hireboard::pagination::{PageLimits, PageRequest};
use hireboard::recruitment::{RecruitmentUserPosts, RecruitmentUserService};
use hireboard::store::{MemoryStore, Transaction, UnitOfWork};
use hireboard::Principal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// JSON fixture to load instead of the bundled demo data
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Id of the applicant driving the walkthrough
    #[arg(long, default_value_t = 2)]
    pub(crate) user: u64,
    /// Open post to apply to
    #[arg(long, default_value_t = 10)]
    pub(crate) post: u64,
    /// Closed post used to show the closed-recruitment guard
    #[arg(long, default_value_t = 11)]
    pub(crate) closed_post: u64,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = build_store(args.fixture.as_deref())?;
    let service = RecruitmentUserService::new(PageLimits::default());
    let user = Principal::new(args.user);
    let post = PostId(args.post);

    println!("Recruitment workflow demo for user {}", user.id);

    step("apply", apply(&store, &service, &user, post));
    step("apply again", apply(&store, &service, &user, post));
    match listing(&store, &service, &user, "APPLIED") {
        Ok(posts) => render_listing(&posts),
        Err(err) => println!("  list APPLIED: {err}"),
    }
    step("cancel", cancel(&store, &service, &user, post));
    step("cancel again", cancel(&store, &service, &user, post));
    step(
        "apply to closed post",
        apply(&store, &service, &user, PostId(args.closed_post)),
    );

    println!("\nApplications stored: {}", store.application_count()?);
    Ok(())
}

fn step(label: &str, outcome: Result<String, ServiceError>) {
    match outcome {
        Ok(detail) => println!("  {label}: ok ({detail})"),
        Err(err) => {
            let code = err.code().map(|code| code.code()).unwrap_or("ERROR");
            println!("  {label}: {code} - {err}");
        }
    }
}

fn apply(
    store: &MemoryStore,
    service: &RecruitmentUserService,
    user: &Principal,
    post: PostId,
) -> Result<String, ServiceError> {
    let mut tx = store.begin()?;
    let application = service.save_recruitment(&mut tx, user, post)?;
    tx.commit()?;
    Ok(format!("{} is {}", application.id, application.status.label()))
}

fn cancel(
    store: &MemoryStore,
    service: &RecruitmentUserService,
    user: &Principal,
    post: PostId,
) -> Result<String, ServiceError> {
    let mut tx = store.begin()?;
    service.cancel_recruitment(&mut tx, user, post)?;
    tx.commit()?;
    Ok(format!("withdrew from {post}"))
}

fn listing(
    store: &MemoryStore,
    service: &RecruitmentUserService,
    user: &Principal,
    status: &str,
) -> Result<RecruitmentUserPosts, ServiceError> {
    let tx = store.begin()?;
    service.get_accepted_posts(&tx, user, status, PageRequest::first(service.limits()))
}

fn render_listing(posts: &RecruitmentUserPosts) {
    println!(
        "  list {}: {} post(s)",
        posts.status.label(),
        posts.posts.total_elements
    );
    for summary in &posts.posts.content {
        println!(
            "    - {} {} [{}] closes {}",
            summary.post_id,
            summary.subject,
            summary.recruitment_status.label(),
            summary.recruitment_closing_date.format("%Y-%m-%d")
        );
    }
}
