pub mod middleware;
pub mod principal;

pub use principal::{
    DynPrincipalResolver, DynUserDirectory, JwtPrincipalResolver, Principal, PrincipalResolver,
    StaticUserDirectory, UserDirectory, UserProfile,
};
