//! Per-entity search vocabularies.

use st_core::SearchEntity;

/// Quick-tag groups. Each entity accepts a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Fixed-price projects only.
    FixedPrice,
    /// Finished contracts only.
    Completed,
    /// Started within the last N years.
    Years,
    /// Minimum amount in units of 10 000.
    MinAmount,
    /// Company code.
    Group,
    /// Business-type shortcut.
    Category,
    NotExpired,
    /// Patent, copyright or trademark.
    IpKind,
}

/// Search vocabulary of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityProfile {
    pub entity: SearchEntity,
    /// Drawer filter keys sent as-is.
    pub filter_keys: &'static [&'static str],
    pub tags: &'static [TagKind],
    /// Parameters sent with every request.
    pub fixed_params: &'static [(&'static str, &'static str)],
}

impl EntityProfile {
    pub fn accepts(&self, key: &str) -> bool {
        self.filter_keys.contains(&key)
    }

    pub fn supports(&self, tag: TagKind) -> bool {
        self.tags.contains(&tag)
    }

    pub const fn path(&self) -> &'static str {
        self.entity.path_segment()
    }
}

const CONTRACTS: EntityProfile = EntityProfile {
    entity: SearchEntity::Contracts,
    filter_keys: &[
        "customer",
        "contract_type",
        "status",
        "tags",
        "industry",
        "min_amount",
        "max_amount",
        "start_date",
        "end_date",
        "is_fp",
    ],
    tags: &[
        TagKind::FixedPrice,
        TagKind::Completed,
        TagKind::Years,
        TagKind::MinAmount,
    ],
    fixed_params: &[],
};

const QUALIFICATIONS: EntityProfile = EntityProfile {
    entity: SearchEntity::Qualifications,
    filter_keys: &[
        "qualification_type",
        "status",
        "company",
        "business_type",
        "is_expired",
    ],
    tags: &[TagKind::Group, TagKind::Category, TagKind::NotExpired],
    fixed_params: &[],
};

const INTELLECTUAL_PROPERTY: EntityProfile = EntityProfile {
    entity: SearchEntity::IntellectualProperty,
    filter_keys: &[
        "qualification_type",
        "company",
        "company_name",
        "company_number",
        "business_type",
        "is_expired",
    ],
    tags: &[
        TagKind::Group,
        TagKind::Category,
        TagKind::NotExpired,
        TagKind::IpKind,
    ],
    fixed_params: &[("category", "intellectual_property")],
};

const PERSONNEL: EntityProfile = EntityProfile {
    entity: SearchEntity::Personnel,
    filter_keys: &["status", "company", "degree", "certificate_name"],
    tags: &[TagKind::Group],
    fixed_params: &[],
};

const COMPANIES: EntityProfile = EntityProfile {
    entity: SearchEntity::Companies,
    filter_keys: &["company_name", "company_number", "industry", "status"],
    tags: &[],
    fixed_params: &[],
};

pub const fn profile(entity: SearchEntity) -> &'static EntityProfile {
    match entity {
        SearchEntity::Contracts => &CONTRACTS,
        SearchEntity::Qualifications => &QUALIFICATIONS,
        SearchEntity::IntellectualProperty => &INTELLECTUAL_PROPERTY,
        SearchEntity::Personnel => &PERSONNEL,
        SearchEntity::Companies => &COMPANIES,
    }
}
