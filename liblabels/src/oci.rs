//! Well-known OCI image labels and the variables that set them.

/// Variable carrying free-form `key=value` labels.
pub const IMAGE_LABELS: &str = "BP_IMAGE_LABELS";

/// A variable that sets one of the pre-defined OCI annotation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownLabel {
    pub variable: &'static str,
    pub key: &'static str,
    pub description: &'static str,
}

const fn entry(
    variable: &'static str,
    key: &'static str,
    description: &'static str,
) -> WellKnownLabel {
    WellKnownLabel {
        variable,
        key,
        description,
    }
}

/// The fixed variable-to-key table, ordered by variable name.
pub const WELL_KNOWN: &[WellKnownLabel] = &[
    entry(
        "BP_OCI_AUTHORS",
        "org.opencontainers.image.authors",
        "the org.opencontainers.image.authors image label",
    ),
    entry(
        "BP_OCI_CREATED",
        "org.opencontainers.image.created",
        "the org.opencontainers.image.created image label",
    ),
    entry(
        "BP_OCI_DESCRIPTION",
        "org.opencontainers.image.description",
        "the org.opencontainers.image.description image label",
    ),
    entry(
        "BP_OCI_DOCUMENTATION",
        "org.opencontainers.image.documentation",
        "the org.opencontainers.image.documentation image label",
    ),
    entry(
        "BP_OCI_LICENSES",
        "org.opencontainers.image.licenses",
        "the org.opencontainers.image.licenses image label",
    ),
    entry(
        "BP_OCI_REF_NAME",
        "org.opencontainers.image.ref.name",
        "the org.opencontainers.image.ref.name image label",
    ),
    entry(
        "BP_OCI_REVISION",
        "org.opencontainers.image.revision",
        "the org.opencontainers.image.revision image label",
    ),
    entry(
        "BP_OCI_SOURCE",
        "org.opencontainers.image.source",
        "the org.opencontainers.image.source image label",
    ),
    entry(
        "BP_OCI_TITLE",
        "org.opencontainers.image.title",
        "the org.opencontainers.image.title image label",
    ),
    entry(
        "BP_OCI_URL",
        "org.opencontainers.image.url",
        "the org.opencontainers.image.url image label",
    ),
    entry(
        "BP_OCI_VENDOR",
        "org.opencontainers.image.vendor",
        "the org.opencontainers.image.vendor image label",
    ),
    entry(
        "BP_OCI_VERSION",
        "org.opencontainers.image.version",
        "the org.opencontainers.image.version image label",
    ),
];

/// Every variable whose presence makes detection pass.
pub fn trigger_variables() -> impl Iterator<Item = &'static str> {
    WELL_KNOWN
        .iter()
        .map(|label| label.variable)
        .chain(std::iter::once(IMAGE_LABELS))
}
