//! Repository implementation for client requests.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        client::Client,
        client_request::{ClientRequest, NewClientRequest, RequestStatus, UpdateClientRequest},
        request_type::RequestType,
        types::ClientRequestId,
    },
    models::{
        client::Client as DbClient,
        client_request::{
            ClientRequest as DbClientRequest, NewClientRequest as DbNewClientRequest,
            UpdateClientRequest as DbUpdateClientRequest,
        },
        request_type::RequestType as DbRequestType,
    },
    repository::{
        ClientRequestListQuery, ClientRequestReader, ClientRequestWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl ClientRequestReader for DieselRepository {
    fn get_client_request_by_id(
        &self,
        id: ClientRequestId,
    ) -> RepositoryResult<Option<ClientRequest>> {
        use crate::schema::client_requests;

        let mut conn = self.conn()?;
        let request = client_requests::table
            .find(id.get())
            .first::<DbClientRequest>(&mut conn)
            .optional()?;

        request
            .map(ClientRequest::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_client_requests(
        &self,
        query: ClientRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<(ClientRequest, Client, RequestType)>)> {
        use crate::schema::{client_requests, clients, request_types};

        let mut conn = self.conn()?;
        let since = query.created.since(Utc::now().naive_utc());

        let query_builder = || {
            let mut items = client_requests::table
                .inner_join(clients::table)
                .inner_join(request_types::table)
                .into_boxed::<Sqlite>();

            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    clients::name
                        .like(pattern.clone())
                        .or(request_types::name.like(pattern)),
                );
            }
            if let Some(client_id) = query.client_id {
                items = items.filter(client_requests::client_id.eq(client_id.get()));
            }
            if let Some(status) = &query.status {
                items = items.filter(client_requests::status.eq(status.to_string()));
            }
            if let Some(since) = since {
                items = items.filter(client_requests::created_at.ge(since));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()
            .select((
                DbClientRequest::as_select(),
                DbClient::as_select(),
                DbRequestType::as_select(),
            ))
            .order((client_requests::created_at.desc(), client_requests::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let rows = items.load::<(DbClientRequest, DbClient, DbRequestType)>(&mut conn)?;

        let combined = rows
            .into_iter()
            .map(|(request, client, request_type)| {
                Ok((
                    ClientRequest::try_from(request)?,
                    Client::try_from(client)?,
                    RequestType::try_from(request_type)?,
                ))
            })
            .collect::<Result<Vec<_>, crate::domain::types::TypeConstraintError>>()
            .map_err(RepositoryError::from)?;

        Ok((total, combined))
    }
}

impl ClientRequestWriter for DieselRepository {
    fn create_client_request(&self, request: &NewClientRequest) -> RepositoryResult<ClientRequest> {
        use crate::schema::client_requests;

        let mut conn = self.conn()?;
        let insertable: DbNewClientRequest = request.into();

        let created = diesel::insert_into(client_requests::table)
            .values(&insertable)
            .get_result::<DbClientRequest>(&mut conn)?;

        ClientRequest::try_from(created).map_err(RepositoryError::from)
    }

    fn update_client_request(
        &self,
        id: ClientRequestId,
        updates: &UpdateClientRequest,
    ) -> RepositoryResult<ClientRequest> {
        use crate::schema::client_requests;

        let mut conn = self.conn()?;
        let changeset: DbUpdateClientRequest = updates.into();

        let updated = diesel::update(client_requests::table.find(id.get()))
            .set(&changeset)
            .get_result::<DbClientRequest>(&mut conn)?;

        ClientRequest::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_client_request(&self, id: ClientRequestId) -> RepositoryResult<()> {
        use crate::schema::client_requests;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(client_requests::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_client_requests_status(
        &self,
        ids: &[ClientRequestId],
        status: &RequestStatus,
    ) -> RepositoryResult<usize> {
        use crate::schema::client_requests;

        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let raw_ids = ids.iter().map(|id| id.get()).collect::<Vec<i32>>();

        let updated = diesel::update(client_requests::table.filter(client_requests::id.eq_any(raw_ids)))
            .set((
                client_requests::status.eq(status.to_string()),
                client_requests::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(updated)
    }
}
