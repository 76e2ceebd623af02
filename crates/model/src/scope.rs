use bson::oid::ObjectId;

/// Organizational level an aggregate or recommendation is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Organization(ObjectId),
    Branch(ObjectId),
    Department(ObjectId),
}

impl Scope {
    /// Picks the most specific identifier: department, then branch, then organization.
    pub fn most_specific(
        org_id: Option<ObjectId>,
        branch_id: Option<ObjectId>,
        dept_id: Option<ObjectId>,
    ) -> Option<Scope> {
        dept_id
            .map(Scope::Department)
            .or(branch_id.map(Scope::Branch))
            .or(org_id.map(Scope::Organization))
    }

    pub fn id(&self) -> ObjectId {
        match self {
            Scope::Organization(id) | Scope::Branch(id) | Scope::Department(id) => *id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scope::Organization(_) => "organization",
            Scope::Branch(_) => "branch",
            Scope::Department(_) => "department",
        }
    }
}
