//! Repository implementation for request types.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        request_type::{NewRequestType, RequestType},
        types::RequestTypeId,
    },
    models::request_type::{NewRequestType as DbNewRequestType, RequestType as DbRequestType},
    repository::{
        DieselRepository, RequestTypeListQuery, RequestTypeReader, RequestTypeWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl RequestTypeReader for DieselRepository {
    fn get_request_type_by_id(&self, id: RequestTypeId) -> RepositoryResult<Option<RequestType>> {
        use crate::schema::request_types;

        let mut conn = self.conn()?;
        let request_type = request_types::table
            .find(id.get())
            .first::<DbRequestType>(&mut conn)
            .optional()?;

        request_type
            .map(RequestType::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_request_types(
        &self,
        query: RequestTypeListQuery,
    ) -> RepositoryResult<(usize, Vec<RequestType>)> {
        use crate::schema::request_types;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = request_types::table.into_boxed::<Sqlite>();
            if let Some(term) = &query.search {
                items = items.filter(request_types::name.like(format!("%{term}%")));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((request_types::name.asc(), request_types::id.asc()));
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let request_types = items
            .load::<DbRequestType>(&mut conn)?
            .into_iter()
            .map(RequestType::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)?;

        Ok((total, request_types))
    }
}

impl RequestTypeWriter for DieselRepository {
    fn create_request_type(&self, new_type: &NewRequestType) -> RepositoryResult<RequestType> {
        use crate::schema::request_types;

        let mut conn = self.conn()?;
        let insertable: DbNewRequestType = new_type.into();

        let created = diesel::insert_into(request_types::table)
            .values(&insertable)
            .get_result::<DbRequestType>(&mut conn)?;

        RequestType::try_from(created).map_err(RepositoryError::from)
    }

    fn update_request_type(
        &self,
        id: RequestTypeId,
        updates: &NewRequestType,
    ) -> RepositoryResult<RequestType> {
        use crate::schema::request_types;

        let mut conn = self.conn()?;
        let changeset: DbNewRequestType = updates.into();

        let updated = diesel::update(request_types::table.find(id.get()))
            .set(&changeset)
            .get_result::<DbRequestType>(&mut conn)?;

        RequestType::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_request_type(&self, id: RequestTypeId) -> RepositoryResult<()> {
        use crate::schema::{client_requests, request_types};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let in_use = client_requests::table
                .filter(client_requests::request_type_id.eq(id.get()))
                .count()
                .get_result::<i64>(conn)?;
            if in_use > 0 {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "Request type {id} is referenced by {in_use} client requests"
                )));
            }

            let deleted = diesel::delete(request_types::table.find(id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }
}
