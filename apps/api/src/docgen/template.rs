//! Payload builder: renders the fixed NDAQ job descriptor from a contact
//! and an opportunity, then base64-encodes it for transport.
//!
//! Field values are inserted verbatim — no XML escaping is performed, so
//! callers must not pass content containing markup-breaking syntax. This is
//! a documented limitation of the upstream contract, not defended against.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::models::{or_fallback, ContactRecord, OpportunityRecord};

/// The job descriptor sent to the upstream submit endpoint. The `{{{...}}}`
/// markers inside `<find>` elements are literal search tokens the upstream
/// resolves against the source document; only the `{snake_case}` slots are
/// substituted here.
const JOB_DESCRIPTOR_TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package version="1">
    <content count="1" resolve="0">
        <item fileId="4412"
              addType="0"
              ext="docx"
              exts=""
              catType="0"
              target="4"/>
    </content>
    <output>
        <file name="{file_name}"
              type="DOC">
            <notifyOnCreate>true</notifyOnCreate>
            <notification>
                <from>support@accent-technologies.com</from>
                <subject>Personalized Document Generated</subject>
            </notification>
            <textReplace>
                <text target="0">
                    <find>{{{ContactName}}}</find>
                    <replace>{contact_name}</replace>
                </text>
                <text target="0">
                    <find>{{{FirstName}}}</find>
                    <replace>{first_name}</replace>
                </text>
                <text target="0">
                    <find>{{{LastName}}}</find>
                    <replace>{last_name}</replace>
                </text>
                <text target="0">
                    <find>{{{CompanyName}}}</find>
                    <replace>{company_name}</replace>
                </text>
                <text target="0">
                    <find>{{{Industry}}}</find>
                    <replace>{industry}</replace>
                </text>
                <text target="0">
                    <find>{{{ContactTitle}}}</find>
                    <replace>{contact_title}</replace>
                </text>
                <text target="0">
                    <find>{{{OpportunityName}}}</find>
                    <replace>{opportunity_name}</replace>
                </text>
                <text target="0">
                    <find>{{{OpportunityStage}}}</find>
                    <replace>{opportunity_stage}</replace>
                </text>
                <text target="0">
                    <find>{{{City}}}</find>
                    <replace>{city}</replace>
                </text>
                <text target="0">
                    <find>{{{State}}}</find>
                    <replace>{state}</replace>
                </text>
                <text target="0">
                    <find>{{{Country}}}</find>
                    <replace>{country}</replace>
                </text>
            </textReplace>
        </file>
    </output>
</package>"#;

/// Renders the personalized job descriptor and base64-encodes it.
/// Pure and total: every slot resolves, falling back to a human-readable
/// default when the corresponding field is absent or empty.
pub fn build_job_descriptor(contact: &ContactRecord, opportunity: &OpportunityRecord) -> String {
    BASE64.encode(render_package_xml(contact, opportunity))
}

fn render_package_xml(contact: &ContactRecord, opportunity: &OpportunityRecord) -> String {
    let file_name = format!(
        "{} - {} Proposal",
        contact.display_name(),
        opportunity.display_name()
    );

    JOB_DESCRIPTOR_TEMPLATE
        .replace("{file_name}", &file_name)
        .replace("{contact_name}", contact.display_name())
        .replace("{first_name}", or_fallback(&contact.first_name, "Valued"))
        .replace("{last_name}", or_fallback(&contact.last_name, "Contact"))
        .replace(
            "{company_name}",
            or_fallback(&contact.company_name, "Your Company"),
        )
        .replace("{industry}", or_fallback(&contact.industry, "Industry"))
        .replace(
            "{contact_title}",
            or_fallback(&contact.title, "Professional"),
        )
        .replace("{opportunity_name}", opportunity.display_name())
        .replace(
            "{opportunity_stage}",
            or_fallback(&opportunity.stage, "In Progress"),
        )
        .replace("{city}", or_fallback(&contact.city, "Your City"))
        .replace("{state}", or_fallback(&contact.state, "Your State"))
        .replace("{country}", or_fallback(&contact.country, "Your Country"))
}
