//! Publication and subscription differs.

use crate::catalog::publication::{Publication, Subscription};
use crate::diff::comment_utils::diff_comment;
use crate::diff::foreign_data::option_deltas;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, PublicationChange, SubscriptionChange};
use crate::diff::PlanContext;

fn publication_create_changes(ctx: &PlanContext, publication: &Publication) -> Vec<Change> {
    let mut changes = vec![Change::Publication(PublicationChange::Create {
        publication: publication.clone(),
    })];
    if publication.owner != ctx.current_user {
        changes.push(Change::Publication(PublicationChange::ChangeOwner {
            name: publication.name.clone(),
            owner: publication.owner.clone(),
        }));
    }
    if let Some(comment) = &publication.comment {
        changes.push(Change::Publication(PublicationChange::Comment {
            name: publication.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes
}

pub fn diff_publications(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.publications,
        &ctx.branch.publications,
        Publication::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for publication in parts.created {
        changes.extend(publication_create_changes(ctx, publication));
    }

    for publication in parts.dropped {
        changes.push(Change::Publication(PublicationChange::Drop {
            name: publication.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        // FOR ALL TABLES cannot be toggled in place.
        if main.all_tables != branch.all_tables {
            changes.push(Change::Publication(PublicationChange::Drop {
                name: main.name.clone(),
            }));
            changes.extend(publication_create_changes(ctx, branch));
            continue;
        }

        if !branch.all_tables && main.tables != branch.tables {
            changes.push(Change::Publication(PublicationChange::SetTables {
                name: branch.name.clone(),
                tables: branch.tables.clone(),
            }));
        }
        if main.publish != branch.publish {
            changes.push(Change::Publication(PublicationChange::SetPublish {
                name: branch.name.clone(),
                publish: branch.publish.clone(),
            }));
        }
        if main.owner != branch.owner {
            changes.push(Change::Publication(PublicationChange::ChangeOwner {
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Publication(PublicationChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}

fn subscription_create_changes(ctx: &PlanContext, subscription: &Subscription) -> Vec<Change> {
    let mut changes = vec![Change::Subscription(SubscriptionChange::Create {
        subscription: subscription.clone(),
    })];
    if subscription.owner != ctx.current_user {
        changes.push(Change::Subscription(SubscriptionChange::ChangeOwner {
            name: subscription.name.clone(),
            owner: subscription.owner.clone(),
        }));
    }
    if let Some(comment) = &subscription.comment {
        changes.push(Change::Subscription(SubscriptionChange::Comment {
            name: subscription.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes
}

pub fn diff_subscriptions(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.subscriptions,
        &ctx.branch.subscriptions,
        Subscription::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for subscription in parts.created {
        changes.extend(subscription_create_changes(ctx, subscription));
    }

    for subscription in parts.dropped {
        changes.push(Change::Subscription(SubscriptionChange::Drop {
            name: subscription.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if main.connection != branch.connection {
            changes.push(Change::Subscription(SubscriptionChange::SetConnection {
                name: branch.name.clone(),
                connection: branch.connection.clone(),
            }));
        }
        if main.publications != branch.publications {
            changes.push(Change::Subscription(SubscriptionChange::SetPublications {
                name: branch.name.clone(),
                publications: branch.publications.clone(),
            }));
        }
        if main.enabled != branch.enabled {
            changes.push(Change::Subscription(if branch.enabled {
                SubscriptionChange::Enable {
                    name: branch.name.clone(),
                }
            } else {
                SubscriptionChange::Disable {
                    name: branch.name.clone(),
                }
            }));
        }
        let deltas = option_deltas(&main.options, &branch.options);
        if !deltas.is_empty() {
            changes.push(Change::Subscription(SubscriptionChange::SetOptions {
                name: branch.name.clone(),
                options: deltas,
            }));
        }
        if main.owner != branch.owner {
            changes.push(Change::Subscription(SubscriptionChange::ChangeOwner {
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Subscription(SubscriptionChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}
