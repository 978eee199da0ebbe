//! Profile Queries

/// 获取档案查询
#[derive(Debug, Clone)]
pub struct GetProfile {
    pub name: String,
}

/// 列出所有档案查询
#[derive(Debug, Clone)]
pub struct ListProfiles;
