//! Compile-only tests for the model API surface.
//!
//! These verify that key call patterns type-check — model functions with a
//! plain client, with a transaction, and with criteria/patch inputs. They do
//! NOT execute against a database.

#![allow(dead_code)]

use jobboard::{
    FilterCriteria, GenericClient, NewOrganization, NewPosting, Organization, OrganizationPatch,
    Posting, PostingPatch, Result,
};

async fn organization_crud(conn: &impl GenericClient) -> Result<()> {
    let input = NewOrganization {
        handle: "acme".into(),
        name: "Acme".into(),
        description: None,
        num_employees: Some(25),
        logo_url: None,
    };
    let org = Organization::create(conn, &input).await?;

    let criteria = FilterCriteria::new().add("nameLike", "ac").add("minEmployees", 10);
    let _all = Organization::find_all(conn, &criteria).await?;

    let patch = OrganizationPatch {
        name: Some("Acme Ltd".into()),
        ..Default::default()
    };
    let _updated = Organization::update(conn, &org.handle, &patch).await?;
    let _fetched = Organization::get(conn, &org.handle).await?;
    Organization::delete(conn, &org.handle).await
}

async fn posting_crud(conn: &impl GenericClient) -> Result<()> {
    let input = NewPosting {
        title: "Engineer".into(),
        salary: Some(90_000),
        equity: None,
        org_handle: "acme".into(),
    };
    let posting = Posting::create(conn, &input).await?;

    let criteria = FilterCriteria::new()
        .add("title", "eng")
        .add("minSalary", 50_000)
        .add("hasEquity", true);
    let _all = Posting::find_all(conn, &criteria).await?;

    let patch = PostingPatch {
        salary: Some(95_000),
        ..Default::default()
    };
    let _updated = Posting::update(conn, posting.id, &patch).await?;
    Posting::delete(conn, posting.id).await
}

// Model functions compose inside transactions through the same trait.
async fn works_in_transaction(tx: &tokio_postgres::Transaction<'_>) -> Result<Vec<Posting>> {
    Posting::find_all(tx, &FilterCriteria::new()).await
}

#[test]
fn api_surface_compiles() {}
