use crate::domain::models::user::User as DomainUser;
use shared::User as SharedUser;

pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            name: domain.name,
        }
    }
}
